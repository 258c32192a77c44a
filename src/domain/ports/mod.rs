//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod deploy_events;
pub mod local_runner;
pub mod remote_shell;
pub mod run_lock;
pub mod transfer;

pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use local_runner::LocalRunner;
pub use remote_shell::{CommandOutput, RemoteConnector, RemoteShell, ShellError};
pub use run_lock::{LockError, LockGuard, RunLock};
pub use transfer::{PlannedFile, PushReport, PushRequest, TransferError, TransferStrategy};
