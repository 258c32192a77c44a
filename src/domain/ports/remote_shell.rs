//! Remote Shell Port
//!
//! Every remote operation is one shell command executed on the target host.
//! Stages build commands and interpret exit status and output; the
//! transport (ssh) lives in infrastructure.

use crate::domain::entities::EnvironmentProfile;
use thiserror::Error;

/// Captured result of one remote command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code (`None` if the process was killed by a signal)
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short reason for a failed command: stderr, else stdout, else exit code.
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return last_lines(stderr, 5);
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return last_lines(stdout, 5);
        }
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

/// Transport-level failure: the command could not be executed at all
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("connection to {target} failed: {message}")]
    Connection { target: String, message: String },
}

pub trait RemoteShell: Send + Sync {
    /// `user@host` of the session, for messages
    fn target(&self) -> String;

    /// Run a command through the remote login shell.
    fn run(&self, command: &str) -> Result<CommandOutput, ShellError>;

    /// Run a command with `input` written to its stdin.
    fn run_with_input(&self, command: &str, input: &[u8]) -> Result<CommandOutput, ShellError>;
}

/// Opens remote shells for a resolved profile.
pub trait RemoteConnector: Send + Sync {
    fn connect(&self, profile: &EnvironmentProfile) -> Box<dyn RemoteShell>;
}
