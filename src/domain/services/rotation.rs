//! Backup rotation
//!
//! Backup ids start with a sortable timestamp and end with the mode, so
//! rotation works on names alone: per mode, keep the newest `keep`.

use crate::domain::entities::BackupMode;

/// Names of `mode` backups beyond the newest `keep`, oldest first.
///
/// Names that do not carry the mode suffix are never selected.
pub fn select_expired<S: AsRef<str>>(names: &[S], mode: BackupMode, keep: usize) -> Vec<String> {
    let suffix = format!("-{}", mode.as_str());
    let mut matching: Vec<&str> = names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.ends_with(&suffix) && is_timestamped(name))
        .collect();
    matching.sort_unstable();
    matching.dedup();

    let excess = matching.len().saturating_sub(keep);
    matching[..excess].iter().map(|s| s.to_string()).collect()
}

fn is_timestamped(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 15
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'_'
        && bytes[9..15].iter().all(u8::is_ascii_digit)
}
