//! SSH endpoint value object
//!
//! Connection parameters shared by the remote shell and both transfer
//! mechanisms, so ssh, rsync and scp always agree on key, port and timeouts.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshEndpoint {
    pub user: String,
    pub host: String,
    pub port: u16,
    pub key: PathBuf,
    pub connect_timeout: Duration,
}

impl SshEndpoint {
    /// `user@host`
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// `user@host:path`
    pub fn remote_spec(&self, path: &str) -> String {
        format!("{}:{}", self.destination(), path)
    }

    /// Options common to ssh and scp (everything except the port flag).
    fn common_options(&self) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.key.display().to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
            "-o".to_string(),
            "ServerAliveInterval=15".to_string(),
            "-o".to_string(),
            "ServerAliveCountMax=4".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
        ]
    }

    /// Arguments for `ssh`, excluding the destination.
    pub fn ssh_args(&self) -> Vec<String> {
        let mut args = vec!["-p".to_string(), self.port.to_string()];
        args.extend(self.common_options());
        args
    }

    /// Arguments for `scp` (which spells the port flag `-P`).
    pub fn scp_args(&self) -> Vec<String> {
        let mut args = vec!["-P".to_string(), self.port.to_string()];
        args.extend(self.common_options());
        args
    }

    /// Remote shell string for `rsync -e`.
    pub fn rsync_shell(&self) -> String {
        let mut parts = vec!["ssh".to_string()];
        parts.extend(
            self.ssh_args()
                .into_iter()
                .map(|arg| crate::domain::services::shell::quote_if_needed(&arg)),
        );
        parts.join(" ")
    }
}
