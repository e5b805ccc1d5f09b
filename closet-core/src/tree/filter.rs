//! Search filtering for the group tree

use crate::models::CredentialGroup;

/// Returns true if the group's name contains `needle`, ignoring case
///
/// `needle` must already be lowercase.
#[must_use]
pub fn name_matches(group: &CredentialGroup, needle: &str) -> bool {
    group.name.to_lowercase().contains(needle)
}

/// Filters the forest down to groups relevant to `query`
///
/// A group is kept if its name contains the query (case-insensitive) or if
/// any descendant does. When some of a kept group's child subtrees match,
/// the group keeps only those filtered children; when none do, the group
/// matched on its own name and keeps its original children untouched.
/// A blank query returns the forest unchanged.
#[must_use]
pub fn filter_groups(forest: &[CredentialGroup], query: &str) -> Vec<CredentialGroup> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return forest.to_vec();
    }

    let _span = tracing::debug_span!(crate::tracing::span_names::GROUPS_FILTER, query = %needle).entered();
    filter_level(forest, &needle)
}

fn filter_level(forest: &[CredentialGroup], needle: &str) -> Vec<CredentialGroup> {
    forest
        .iter()
        .filter_map(|group| {
            let filtered_children = filter_level(&group.children, needle);
            if !filtered_children.is_empty() {
                let mut kept = group.shallow_clone();
                kept.children = filtered_children;
                Some(kept)
            } else if name_matches(group, needle) {
                Some(group.clone())
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn leaf(name: &str) -> CredentialGroup {
        CredentialGroup::with_parent(name, Uuid::nil())
    }

    fn root(name: &str, children: Vec<CredentialGroup>) -> CredentialGroup {
        CredentialGroup::new_root(name, Uuid::new_v4()).with_children(children)
    }

    #[test]
    fn test_prod_scenario() {
        let forest = vec![
            root("Root1", vec![leaf("prodServer")]),
            root("Root2", vec![leaf("other")]),
        ];

        let filtered = filter_groups(&forest, "prod");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Root1");
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].name, "prodServer");
    }

    #[test]
    fn test_matching_parent_keeps_all_children() {
        let forest = vec![root("Production", vec![leaf("web"), leaf("db")])];
        let filtered = filter_groups(&forest, "PROD");
        assert_eq!(filtered[0].children.len(), 2);
    }

    #[test]
    fn test_matching_child_narrows_matching_parent() {
        let forest = vec![root("db-hosts", vec![leaf("db-primary"), leaf("cache")])];
        let filtered = filter_groups(&forest, "db");
        let names: Vec<_> = filtered[0].children.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["db-primary"]);
    }

    #[test]
    fn test_empty_query_is_identity() {
        let forest = vec![root("A", vec![leaf("b")]), root("C", vec![])];
        assert_eq!(filter_groups(&forest, ""), forest);
        assert_eq!(filter_groups(&forest, "   "), forest);
    }

    #[test]
    fn test_no_match_yields_empty_forest() {
        let forest = vec![root("A", vec![leaf("b")])];
        assert!(filter_groups(&forest, "zzz").is_empty());
    }

    #[test]
    fn test_deep_match_keeps_chain() {
        let deep = root("L0", vec![leaf("L1").with_children(vec![leaf("target")])]);
        let filtered = filter_groups(&[deep], "target");
        assert_eq!(filtered[0].children[0].children[0].name, "target");
    }
}
