//! Local process runner for the development environment.

use std::io;
use std::path::Path;
use std::process::Command;

use crate::domain::ports::LocalRunner;

/// Runs commands through `sh -c` with the terminal attached.
pub struct ProcessRunner;

impl LocalRunner for ProcessRunner {
    fn run(&self, command: &str, cwd: &Path) -> io::Result<i32> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .status()?;
        // Killed by a signal: no code, report plain failure
        Ok(status.code().unwrap_or(1))
    }
}
