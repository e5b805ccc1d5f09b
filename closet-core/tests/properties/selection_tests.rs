//! Property-based tests for selection state

use closet_core::state::{Selection, Session};
use closet_core::tree::{build_path, flatten, is_descendant_or_self};
use proptest::prelude::*;
use proptest::sample::Index;

use super::forest_strategy;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Selecting a group stores its full path and expands only ancestors.
    #[test]
    fn prop_select_stores_path(forest in forest_strategy(), pick in any::<Index>()) {
        let all = flatten(&forest);
        let target = pick.get(&all).id;

        let mut selection = Selection::new();
        prop_assert!(selection.select(&forest, target));

        let expected: Vec<_> = build_path(&forest, target)
            .unwrap_or_default()
            .iter()
            .map(|g| g.id)
            .collect();
        let stored: Vec<_> = selection.path().iter().map(|g| g.id).collect();
        prop_assert_eq!(&stored, &expected);

        let expanded = selection.expanded();
        prop_assert_eq!(expanded.len(), expected.len() - 1);
        prop_assert!(!expanded.contains(&target));
        prop_assert_eq!(selection.breadcrumb().split(" / ").count(), expected.len());
    }

    /// Deleting a group clears the selection exactly when the selection is
    /// the deleted group or below it.
    #[test]
    fn prop_delete_clears_selection_in_subtree(
        forest in forest_strategy(),
        selected in any::<Index>(),
        deleted in any::<Index>(),
    ) {
        let all = flatten(&forest);
        let selected = selected.get(&all).id;
        let deleted = deleted.get(&all).id;

        let mut selection = Selection::new();
        selection.select(&forest, selected);
        let cleared = selection.on_group_deleted(&forest, deleted);

        prop_assert_eq!(cleared, is_descendant_or_self(&forest, deleted, selected));
        prop_assert_eq!(selection.selected_id().is_none(), cleared);
    }

    /// Session-level deletes report the whole removed subtree.
    #[test]
    fn prop_session_delete_reports_subtree(
        forest in forest_strategy(),
        deleted in any::<Index>(),
    ) {
        let all = flatten(&forest);
        let deleted = deleted.get(&all).id;

        let mut session = Session::new(None);
        session.cache_mut().store_groups(forest.clone());
        let removed = session.record_group_deleted(deleted);

        for group in &all {
            prop_assert_eq!(
                removed.contains(&group.id),
                is_descendant_or_self(&forest, deleted, group.id)
            );
        }
        prop_assert!(session.cache().groups().is_none());
    }
}
