//! Migration action selection
//!
//! Each reachable database state maps to exactly one action. Seed logic is
//! part of the first-install action only.

use crate::domain::value_objects::DatabaseState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    /// Apply the migration chain up to head
    Upgrade,
    /// Create baseline records
    Seed,
}

impl MigrationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationStep::Upgrade => "upgrade",
            MigrationStep::Seed => "seed",
        }
    }
}

impl std::fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationAction {
    /// Empty schema: full chain then seed
    Initialize,
    /// Behind head: chain from the recorded revision
    Upgrade {
        from: Option<String>,
        to: String,
        pending: Vec<String>,
    },
    /// Already at head
    Noop { revision: Option<String> },
}

impl MigrationAction {
    /// `None` for `Unreachable`: no action exists for it.
    pub fn for_state(state: &DatabaseState) -> Option<Self> {
        match state {
            DatabaseState::Unreachable { .. } => None,
            DatabaseState::Uninitialized => Some(MigrationAction::Initialize),
            DatabaseState::PendingMigrations {
                current,
                head,
                pending,
            } => Some(MigrationAction::Upgrade {
                from: current.clone(),
                to: head.clone(),
                pending: pending.clone(),
            }),
            DatabaseState::Current { revision } => Some(MigrationAction::Noop {
                revision: revision.clone(),
            }),
        }
    }

    pub fn steps(&self) -> &'static [MigrationStep] {
        match self {
            MigrationAction::Initialize => &[MigrationStep::Upgrade, MigrationStep::Seed],
            MigrationAction::Upgrade { .. } => &[MigrationStep::Upgrade],
            MigrationAction::Noop { .. } => &[],
        }
    }

    pub fn runs_seed(&self) -> bool {
        self.steps().contains(&MigrationStep::Seed)
    }
}
