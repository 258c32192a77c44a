//! Local Runner Port
//!
//! The development environment is not deployed; it is handed to a local
//! command (e.g. `docker compose up --build`) whose exit status becomes the
//! run's exit status.

use std::io;
use std::path::Path;

pub trait LocalRunner: Send + Sync {
    /// Run `command` in `cwd` with inherited stdio and return its exit code.
    fn run(&self, command: &str, cwd: &Path) -> io::Result<i32>;
}
