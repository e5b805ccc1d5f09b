//! Property-based tests for type inheritance

use closet_core::inheritance::{GroupTypeCatalog, NewGroup, effective_type_id};
use closet_core::models::{CredentialGroup, GroupType};
use closet_core::tree::{build_path, flatten};
use proptest::prelude::*;

use super::forest_strategy;

/// One active type per root, named after its position
fn catalog_for(forest: &[CredentialGroup]) -> GroupTypeCatalog {
    GroupTypeCatalog::new(
        forest
            .iter()
            .enumerate()
            .filter_map(|(i, root)| {
                root.type_id.map(|id| GroupType {
                    id,
                    ..GroupType::new(format!("type-{i}"))
                })
            })
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every group resolves to the type of its root ancestor.
    #[test]
    fn prop_effective_type_is_root_type(forest in forest_strategy()) {
        for group in flatten(&forest) {
            let root = build_path(&forest, group.id).and_then(|p| p.first().copied());
            prop_assert!(root.is_some());
            prop_assert_eq!(
                effective_type_id(&group, &forest),
                root.and_then(|r| r.type_id)
            );
        }
    }

    /// A new sub-group resolves to the same type as its parent.
    #[test]
    fn prop_child_inherits_parent_type(forest in forest_strategy()) {
        for parent in flatten(&forest) {
            let child = CredentialGroup::with_parent("new", parent.id);
            prop_assert_eq!(
                effective_type_id(&child, &forest),
                effective_type_id(&parent, &forest)
            );
        }
    }

    /// Sub-group requests carry the root's type name, whatever type the
    /// caller asked for.
    #[test]
    fn prop_subgroup_request_uses_root_type_name(forest in forest_strategy()) {
        let catalog = catalog_for(&forest);
        for parent in flatten(&forest) {
            let expected = effective_type_id(&parent, &forest)
                .and_then(|id| catalog.get(id))
                .map(|t| t.name.clone());

            let mut input = NewGroup::child("Sub", parent.id);
            input.type_key = Some("something-else".to_string());
            let request = input.validate(&forest, &catalog);
            prop_assert!(request.is_ok());
            let request = request.map(|r| r.credential_group_type_name).ok();
            prop_assert_eq!(request, expected);
        }
    }
}
