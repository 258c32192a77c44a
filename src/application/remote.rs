//! Remote command helpers shared by the pipeline stages.

use crate::domain::ports::{CommandOutput, DeployEvent, DeployEventSink, RemoteShell, ShellError};

/// Run `command`, announcing it to sinks that want detailed events.
pub(crate) fn exec(
    shell: &dyn RemoteShell,
    events: &dyn DeployEventSink,
    command: &str,
) -> Result<CommandOutput, ShellError> {
    if events.wants_detailed_events() {
        events.on_event(DeployEvent::Command {
            command: command.to_string(),
        });
    }
    shell.run(command)
}

/// Run `command` and require exit status 0, returning the failure reason
/// otherwise.
pub(crate) fn exec_ok(
    shell: &dyn RemoteShell,
    events: &dyn DeployEventSink,
    command: &str,
) -> Result<CommandOutput, String> {
    let output = exec(shell, events, command).map_err(|e| e.to_string())?;
    if output.is_success() {
        Ok(output)
    } else {
        Err(output.failure_reason())
    }
}

/// Exit status 0 of a check command (`inspect`, `test -e`); transport errors
/// propagate.
pub(crate) fn probe(
    shell: &dyn RemoteShell,
    events: &dyn DeployEventSink,
    command: &str,
) -> Result<bool, ShellError> {
    exec(shell, events, command).map(|out| out.is_success())
}
