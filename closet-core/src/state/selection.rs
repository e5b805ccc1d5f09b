//! Selected group and its path from the root

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::CredentialGroup;
use crate::tree::{build_path, expanded_ancestors, is_descendant_or_self};

/// The group whose credentials are on display
///
/// `path` always runs from a root down to the selected group, so the
/// breadcrumb and the set of expanded ancestors are derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    group_id: Option<Uuid>,
    path: Vec<CredentialGroup>,
}

impl Selection {
    /// Creates an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id`, returning false and clearing if it is not in `forest`
    pub fn select(&mut self, forest: &[CredentialGroup], id: Uuid) -> bool {
        match build_path(forest, id) {
            Some(path) => {
                self.group_id = Some(id);
                self.path = path.into_iter().map(CredentialGroup::shallow_clone).collect();
                true
            }
            None => {
                tracing::debug!(group_id = %id, "Group not found, clearing selection");
                self.clear();
                false
            }
        }
    }

    /// Deselects
    pub fn clear(&mut self) {
        self.group_id = None;
        self.path.clear();
    }

    /// Rebuilds the path against a refetched forest
    ///
    /// Returns false if the selection had to be cleared.
    pub fn refresh(&mut self, forest: &[CredentialGroup]) -> bool {
        match self.group_id {
            Some(id) => self.select(forest, id),
            None => false,
        }
    }

    /// Clears the selection if `deleted` is the selected group or one of its
    /// ancestors
    ///
    /// `forest` must be the forest from before the delete. Returns true if
    /// the selection was cleared.
    pub fn on_group_deleted(&mut self, forest: &[CredentialGroup], deleted: Uuid) -> bool {
        let affected = self.group_id.is_some_and(|selected| {
            is_descendant_or_self(forest, deleted, selected)
                || self.path.iter().any(|g| g.id == deleted)
        });
        if affected {
            self.clear();
        }
        affected
    }

    /// Returns true if a response for `group_id` may update the display
    #[must_use]
    pub fn accepts(&self, group_id: Uuid) -> bool {
        self.group_id == Some(group_id)
    }

    /// Selected group id
    #[must_use]
    pub const fn selected_id(&self) -> Option<Uuid> {
        self.group_id
    }

    /// Selected group, without children
    #[must_use]
    pub fn selected(&self) -> Option<&CredentialGroup> {
        self.path.last()
    }

    /// Groups from the root down to the selection
    #[must_use]
    pub fn path(&self) -> &[CredentialGroup] {
        &self.path
    }

    /// Ancestors to expand in the tree view
    #[must_use]
    pub fn expanded(&self) -> HashSet<Uuid> {
        expanded_ancestors(&self.path)
    }

    /// Path rendered as `"Root / Child / Selected"`
    #[must_use]
    pub fn breadcrumb(&self) -> String {
        self.path
            .iter()
            .map(CredentialGroup::display_name)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Email[Personal[Old]], Servers
    fn forest() -> (Vec<CredentialGroup>, [Uuid; 4]) {
        let old = CredentialGroup::with_parent("Old", Uuid::nil());
        let personal = CredentialGroup::with_parent("Personal", Uuid::nil()).with_children(vec![old]);
        let email = CredentialGroup::new_root("Email", Uuid::new_v4()).with_children(vec![personal]);
        let servers = CredentialGroup::new_root("Servers", Uuid::new_v4());
        let ids = [
            email.id,
            email.children[0].id,
            email.children[0].children[0].id,
            servers.id,
        ];
        (vec![email, servers], ids)
    }

    #[test]
    fn test_select_builds_path() {
        let (forest, [email, personal, old, _]) = forest();
        let mut selection = Selection::new();
        assert!(selection.select(&forest, old));
        assert_eq!(selection.selected_id(), Some(old));
        assert_eq!(selection.selected().map(|g| g.name.as_str()), Some("Old"));
        assert_eq!(selection.expanded(), HashSet::from([email, personal]));
        assert_eq!(selection.breadcrumb(), "Email / Personal / Old");
        assert!(selection.path().iter().all(|g| g.children.is_empty()));
    }

    #[test]
    fn test_select_missing_clears() {
        let (forest, [email, ..]) = forest();
        let mut selection = Selection::new();
        selection.select(&forest, email);
        assert!(!selection.select(&forest, Uuid::new_v4()));
        assert_eq!(selection.selected_id(), None);
        assert!(selection.path().is_empty());
    }

    #[test]
    fn test_deleting_ancestor_clears() {
        let (forest, [email, _, old, servers]) = forest();
        let mut selection = Selection::new();
        selection.select(&forest, old);

        assert!(!selection.on_group_deleted(&forest, servers));
        assert_eq!(selection.selected_id(), Some(old));

        assert!(selection.on_group_deleted(&forest, email));
        assert_eq!(selection.selected_id(), None);
    }

    #[test]
    fn test_deleting_selected_clears() {
        let (forest, [_, personal, ..]) = forest();
        let mut selection = Selection::new();
        selection.select(&forest, personal);
        assert!(selection.on_group_deleted(&forest, personal));
    }

    #[test]
    fn test_response_guard() {
        let (forest, [email, personal, ..]) = forest();
        let mut selection = Selection::new();
        assert!(!selection.accepts(email));
        selection.select(&forest, email);
        assert!(selection.accepts(email));
        selection.select(&forest, personal);
        assert!(!selection.accepts(email));
    }

    #[test]
    fn test_refresh_drops_vanished_group() {
        let (forest, [_, _, _, servers]) = forest();
        let mut selection = Selection::new();
        selection.select(&forest, servers);
        assert!(selection.refresh(&forest));
        assert!(!selection.refresh(&forest[..1]));
        assert_eq!(selection.selected_id(), None);
    }
}
