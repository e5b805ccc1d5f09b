//! Property-based tests for the group tree
//!
//! Covers the search filter closure, path construction and the arena built
//! from the same forest.

use closet_core::models::CredentialGroup;
use closet_core::tree::{
    GroupForest, build_path, filter_groups, find_group_by_id, flatten, is_descendant_or_self,
    name_matches, subtree_ids,
};
use proptest::prelude::*;

use super::{forest_strategy, name_strategy};

fn has_matching_descendant(group: &CredentialGroup, needle: &str) -> bool {
    group
        .children
        .iter()
        .any(|c| name_matches(c, needle) || has_matching_descendant(c, needle))
}

/// Checks every kept node against the original forest
///
/// `inherited` is true below a node that matched on its own name and kept its
/// original children.
fn assert_closure(
    kept: &[CredentialGroup],
    original: &[CredentialGroup],
    needle: &str,
    inherited: bool,
) -> Result<(), TestCaseError> {
    for node in kept {
        let source = find_group_by_id(original, node.id);
        prop_assert!(source.is_some(), "kept node {} not in original", node.id);
        let Some(source) = source else {
            continue;
        };

        let matches = name_matches(source, needle);
        prop_assert!(
            inherited || matches || has_matching_descendant(source, needle),
            "node {:?} kept without reason",
            source.name
        );

        let untouched = node.children == source.children;
        assert_closure(
            &node.children,
            original,
            needle,
            inherited || (matches && untouched),
        )?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every kept node matches, has a matching descendant, or sits untouched
    /// below a matching ancestor.
    #[test]
    fn prop_filter_keeps_only_relevant_nodes(
        forest in forest_strategy(),
        query in name_strategy(),
    ) {
        let kept = filter_groups(&forest, &query);
        assert_closure(&kept, &forest, &query, false)?;
    }

    /// Every matching group survives the filter.
    #[test]
    fn prop_filter_keeps_every_match(
        forest in forest_strategy(),
        query in name_strategy(),
    ) {
        let kept = filter_groups(&forest, &query);
        for group in flatten(&forest) {
            if name_matches(&group, &query) {
                prop_assert!(
                    find_group_by_id(&kept, group.id).is_some(),
                    "matching group {:?} was dropped",
                    group.name
                );
            }
        }
    }

    /// A blank query returns the forest unchanged.
    #[test]
    fn prop_blank_filter_is_identity(forest in forest_strategy(), spaces in " {0,3}") {
        prop_assert_eq!(filter_groups(&forest, &spaces), forest);
    }

    /// The path to any group starts at a root, ends at the group and follows
    /// parent pointers.
    #[test]
    fn prop_path_follows_parent_pointers(forest in forest_strategy()) {
        for group in flatten(&forest) {
            let path = build_path(&forest, group.id);
            prop_assert!(path.is_some());
            let path = path.unwrap_or_default();

            prop_assert!(path[0].parent_id.is_none());
            prop_assert_eq!(path[path.len() - 1].id, group.id);
            for pair in path.windows(2) {
                prop_assert_eq!(pair[1].parent_id, Some(pair[0].id));
            }
        }
    }

    /// Subtree ids are exactly the groups the descendant check accepts.
    #[test]
    fn prop_subtree_matches_descendant_check(forest in forest_strategy()) {
        let all = flatten(&forest);
        for ancestor in &all {
            let subtree = subtree_ids(&forest, ancestor.id);
            prop_assert_eq!(subtree.first().copied(), Some(ancestor.id));
            for target in &all {
                prop_assert_eq!(
                    subtree.contains(&target.id),
                    is_descendant_or_self(&forest, ancestor.id, target.id)
                );
            }
        }
    }

    /// The arena agrees with the nested forest on size and paths.
    #[test]
    fn prop_arena_matches_nested_forest(forest in forest_strategy()) {
        let arena = GroupForest::from_nested(&forest);
        prop_assert!(arena.is_ok());
        let Ok(arena) = arena else {
            return Ok(());
        };

        let flat = flatten(&forest);
        prop_assert_eq!(arena.len(), flat.len());
        for group in &flat {
            let arena_path: Vec<_> = arena
                .path(group.id)
                .unwrap_or_default()
                .iter()
                .map(|g| g.id)
                .collect();
            let nested_path: Vec<_> = build_path(&forest, group.id)
                .unwrap_or_default()
                .iter()
                .map(|g| g.id)
                .collect();
            prop_assert_eq!(arena_path, nested_path);
        }
        prop_assert_eq!(arena.to_nested(), forest);
    }
}
