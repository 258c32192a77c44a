//! Database state classification
//!
//! Pure mapping from a probe outcome to exactly one `DatabaseState`.
//! Rules, first match wins:
//!
//! 1. probe failed or could not connect → `Unreachable`
//! 2. no migration-history table → `Uninitialized`
//! 3. recorded head differs from the latest script → `PendingMigrations`
//! 4. otherwise → `Current`
//!
//! Heads are compared as single linear revisions.

use crate::domain::value_objects::{DatabaseState, ProbeOutcome, ProbeReport};

pub fn classify(outcome: &ProbeOutcome) -> DatabaseState {
    match outcome {
        ProbeOutcome::Failed { reason } => DatabaseState::Unreachable {
            reason: reason.clone(),
        },
        ProbeOutcome::Report(report) => classify_report(report),
    }
}

fn classify_report(report: &ProbeReport) -> DatabaseState {
    if !report.connected {
        return DatabaseState::Unreachable {
            reason: report
                .error
                .clone()
                .unwrap_or_else(|| "probe could not connect".to_string()),
        };
    }

    if !report.history_table {
        return DatabaseState::Uninitialized;
    }

    let current = non_empty(&report.current_revision);
    match non_empty(&report.head_revision) {
        // No migration scripts bundled: nothing can be applied.
        None => DatabaseState::Current { revision: current },
        Some(head) if current.as_deref() == Some(head.as_str()) => {
            DatabaseState::Current { revision: current }
        }
        Some(head) => {
            let pending = if report.pending.is_empty() {
                vec![head.clone()]
            } else {
                report.pending.clone()
            };
            DatabaseState::PendingMigrations {
                current,
                head,
                pending,
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
