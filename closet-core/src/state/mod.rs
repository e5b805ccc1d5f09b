//! Client-side application state
//!
//! Everything the dashboard kept in ambient component state lives in
//! explicit containers here: the selected group, the workspace scope and
//! the query cache. The service owns one [`Session`] and mutates it from a
//! single task.

pub mod cache;
mod selection;

pub use cache::QueryCache;
pub use selection::Selection;

use uuid::Uuid;

use crate::tree::subtree_ids;

/// Workspace scope, selection and cached queries for one signed-in user
#[derive(Debug, Clone, Default)]
pub struct Session {
    workspace_id: Option<Uuid>,
    selection: Selection,
    cache: QueryCache,
}

impl Session {
    /// Starts a session scoped to `workspace_id`
    #[must_use]
    pub fn new(workspace_id: Option<Uuid>) -> Self {
        Self {
            workspace_id,
            ..Self::default()
        }
    }

    /// Current workspace
    #[must_use]
    pub const fn workspace_id(&self) -> Option<Uuid> {
        self.workspace_id
    }

    /// Current selection
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable selection
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Cached queries
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Mutable cached queries
    pub fn cache_mut(&mut self) -> &mut QueryCache {
        &mut self.cache
    }

    /// Selects `id` in the last fetched forest
    ///
    /// Returns false and clears the selection if the group is unknown.
    pub fn select(&mut self, id: Uuid) -> bool {
        let forest = self.cache.last_groups().unwrap_or_default();
        self.selection.select(forest, id)
    }

    /// Rebuilds the selection path against the last fetched forest
    pub fn refresh_selection(&mut self) -> bool {
        let forest = self.cache.last_groups().unwrap_or_default();
        self.selection.refresh(forest)
    }

    /// Applies a successful cascade delete of `id`
    ///
    /// Must run before the forest is refetched. Clears the selection if it
    /// was inside the deleted subtree, drops the subtree's credential lists
    /// and marks the forest stale. Returns the ids of every removed group.
    pub fn record_group_deleted(&mut self, id: Uuid) -> Vec<Uuid> {
        let forest = self.cache.last_groups().unwrap_or_default();
        let removed = subtree_ids(forest, id);
        if self.selection.on_group_deleted(forest, id) {
            tracing::debug!(group_id = %id, "Selection was inside deleted group");
        }
        self.cache.forget_credentials(removed.iter().copied());
        self.cache.invalidate_groups();
        removed
    }

    /// Moves to another workspace
    ///
    /// Groups and credentials belong to a single workspace, so the
    /// selection and cache are dropped. Returns false if `workspace_id` is
    /// already current.
    pub fn switch_workspace(&mut self, workspace_id: Uuid) -> bool {
        if self.workspace_id == Some(workspace_id) {
            return false;
        }
        tracing::info!(%workspace_id, "Switching workspace");
        self.workspace_id = Some(workspace_id);
        self.selection.clear();
        self.cache.clear();
        true
    }

    /// Forgets everything tied to the signed-in user
    pub fn logout(&mut self) {
        self.workspace_id = None;
        self.selection.clear();
        self.cache.clear();
    }
}
