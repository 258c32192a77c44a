//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `ssh` - Remote shell over the system ssh client
//! - `sync/` - Transfer strategies (rsync, scp)
//! - `lock` - Per-environment file lock in `.deploy/locks`
//! - `local` - Local command runner for development
//! - `events/` - Event sinks (NDJSON)

pub mod events;
pub mod local;
pub mod lock;
pub mod ssh;
pub mod sync;

// Re-export for convenience
pub use events::JsonEventSink;
pub use local::ProcessRunner;
pub use lock::FileRunLock;
pub use ssh::{SshConnector, SshShell};
pub use sync::{default_strategies, detect_strategy, RsyncTransfer, ScpTransfer};
