//! SSH Remote Shell
//!
//! Implements `RemoteShell` by spawning the system `ssh` client once per
//! command. Key, port and timeouts come from the profile's `SshEndpoint`.

use std::io::{self, Write};
use std::process::{Child, Command, Output, Stdio};
use std::time::Duration;

use crate::domain::entities::EnvironmentProfile;
use crate::domain::ports::{CommandOutput, RemoteConnector, RemoteShell, ShellError};
use crate::domain::value_objects::SshEndpoint;

/// Exit status ssh uses for its own failures (connection, auth)
const SSH_ERROR_EXIT: i32 = 255;

pub struct SshShell {
    endpoint: SshEndpoint,
}

impl SshShell {
    pub fn new(endpoint: SshEndpoint) -> Self {
        Self { endpoint }
    }

    fn command(&self, remote_command: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.args(self.endpoint.ssh_args())
            .arg(self.endpoint.destination())
            .arg("--")
            .arg(remote_command);
        cmd
    }

    fn finish(&self, output: Output) -> Result<CommandOutput, ShellError> {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let code = output.status.code();

        if code == Some(SSH_ERROR_EXIT) {
            return Err(ShellError::Connection {
                target: self.target(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput {
            code,
            stdout,
            stderr,
        })
    }

    fn spawn_error(e: std::io::Error) -> ShellError {
        ShellError::Spawn {
            program: "ssh".to_string(),
            message: e.to_string(),
        }
    }
}

impl RemoteShell for SshShell {
    fn target(&self) -> String {
        self.endpoint.destination()
    }

    fn run(&self, command: &str) -> Result<CommandOutput, ShellError> {
        let output = self
            .command(command)
            .stdin(Stdio::null())
            .output()
            .map_err(Self::spawn_error)?;
        self.finish(output)
    }

    fn run_with_input(&self, command: &str, input: &[u8]) -> Result<CommandOutput, ShellError> {
        let child = self
            .command(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(Self::spawn_error)?;

        let (output, written) = feed(child, input).map_err(Self::spawn_error)?;
        let result = self.finish(output)?;
        match written {
            Ok(()) => Ok(result),
            Err(e) => Err(ShellError::Connection {
                target: self.target(),
                message: format!("input not fully delivered: {}", e),
            }),
        }
    }
}

/// Write `input` to the child's stdin, close it, then reap the child even
/// when the write failed.
fn feed(mut child: Child, input: &[u8]) -> io::Result<(Output, io::Result<()>)> {
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input),
        None => Ok(()),
    };
    let output = child.wait_with_output()?;
    Ok((output, written))
}

/// Opens `SshShell`s for resolved profiles.
pub struct SshConnector {
    connect_timeout: Duration,
}

impl SshConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl RemoteConnector for SshConnector {
    fn connect(&self, profile: &EnvironmentProfile) -> Box<dyn RemoteShell> {
        Box::new(SshShell::new(profile.endpoint(self.connect_timeout)))
    }
}
