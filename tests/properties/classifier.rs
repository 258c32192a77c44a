//! Property tests for database classification and migration dispatch.

use proptest::prelude::*;

use campaign_deploy::domain::services::{classify, MigrationAction};
use campaign_deploy::domain::value_objects::{DatabaseState, ProbeOutcome, ProbeReport};

fn revision() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::string::string_regex("[0-9a-f]{0,12}").unwrap())
}

fn report() -> impl Strategy<Value = ProbeReport> {
    (
        any::<bool>(),
        any::<bool>(),
        revision(),
        revision(),
        proptest::collection::vec("[0-9a-f]{12}", 0..4),
        proptest::option::of("[a-z ]{0,20}"),
    )
        .prop_map(
            |(connected, history_table, current_revision, head_revision, pending, error)| {
                ProbeReport {
                    connected,
                    history_table,
                    current_revision,
                    head_revision,
                    pending,
                    error,
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: every probe report maps to exactly one of the four states,
    /// and every reachable state has exactly one action.
    #[test]
    fn property_classification_is_total(report in report()) {
        let state = classify(&ProbeOutcome::Report(report.clone()));

        prop_assert_eq!(state.is_reachable(), report.connected);
        let action = MigrationAction::for_state(&state);
        prop_assert_eq!(action.is_some(), state.is_reachable());
    }

    /// PROPERTY: only an uninitialized database is ever seeded.
    #[test]
    fn property_seed_only_on_uninitialized(report in report()) {
        let state = classify(&ProbeOutcome::Report(report));
        if let Some(action) = MigrationAction::for_state(&state) {
            prop_assert_eq!(action.runs_seed(), state == DatabaseState::Uninitialized);
        }
    }

    /// PROPERTY: a database at head classifies as current, so a second run
    /// is a no-op.
    #[test]
    fn property_at_head_is_noop(rev in "[0-9a-f]{12}") {
        let report = ProbeReport {
            connected: true,
            history_table: true,
            current_revision: Some(rev.clone()),
            head_revision: Some(rev.clone()),
            ..ProbeReport::default()
        };
        let state = classify(&ProbeOutcome::Report(report));
        prop_assert_eq!(&state, &DatabaseState::Current { revision: Some(rev) });
        let action = MigrationAction::for_state(&state).unwrap();
        prop_assert!(action.steps().is_empty());
    }

    /// PROPERTY: a probe that failed to run is always unreachable.
    #[test]
    fn property_failed_probe_is_unreachable(reason in "[a-z ]{0,30}") {
        let state = classify(&ProbeOutcome::Failed { reason });
        prop_assert!(!state.is_reachable());
    }
}
