//! Property tests for the exclusion list.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use campaign_deploy::domain::value_objects::ExclusionList;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_][a-z0-9_.-]{0,11}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..")
}

fn relative_path() -> impl Strategy<Value = PathBuf> {
    proptest::collection::vec(segment(), 0..4).prop_map(|segs| segs.iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: anything below a `static` directory, at any depth, is excluded.
    #[test]
    fn property_static_subtree_always_excluded(
        prefix in relative_path(),
        suffix in relative_path(),
        leaf in segment(),
    ) {
        let list = ExclusionList::builtin_only();
        let path = prefix.join("static").join(suffix).join(leaf);
        prop_assert!(list.is_excluded(&path, false), "{} not excluded", path.display());
    }

    /// PROPERTY: a re-include in the ignore file cannot expose `static/`.
    #[test]
    fn property_static_cannot_be_reincluded(
        suffix in relative_path(),
        leaf in segment(),
    ) {
        let root = Path::new("/project");
        let list = ExclusionList::from_content(
            root,
            &root.join(".deployignore"),
            "!static/\n!static/**\n",
        )
        .unwrap();
        let path = Path::new("static").join(suffix).join(leaf);
        prop_assert!(list.is_excluded(&path, false));
    }

    /// PROPERTY: paths without a protected component are not excluded by
    /// the built-in list.
    #[test]
    fn property_builtin_list_spares_other_paths(
        segs in proptest::collection::vec(segment(), 1..5),
    ) {
        prop_assume!(segs.iter().all(|s| s != "static" && s != ".deploy" && s != ".git"));
        let path: PathBuf = segs.iter().collect();
        let list = ExclusionList::builtin_only();
        prop_assert!(!list.is_excluded(&path, false));
    }
}
