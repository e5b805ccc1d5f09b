//! Read-your-writes query cache
//!
//! Holds the last fetched group forest and per-group credential lists.
//! Mutations mark entries stale instead of removing them, so callers can
//! still show the last known good data while a refetch is pending.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Credential, CredentialGroup};

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stale: bool,
}

impl<T> Entry<T> {
    const fn fresh(value: T) -> Self {
        Self {
            value,
            stale: false,
        }
    }

    fn get(&self) -> Option<&T> {
        (!self.stale).then_some(&self.value)
    }
}

/// Cached `groups` and `credentials-for-group` query results
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    groups: Option<Entry<Vec<CredentialGroup>>>,
    credentials: HashMap<Uuid, Entry<Vec<Credential>>>,
}

impl QueryCache {
    /// Creates an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh group forest, `None` when stale or never fetched
    #[must_use]
    pub fn groups(&self) -> Option<&[CredentialGroup]> {
        self.groups.as_ref().and_then(Entry::get).map(Vec::as_slice)
    }

    /// Last fetched group forest, stale or not
    #[must_use]
    pub fn last_groups(&self) -> Option<&[CredentialGroup]> {
        self.groups.as_ref().map(|e| e.value.as_slice())
    }

    /// Stores a freshly fetched forest
    pub fn store_groups(&mut self, groups: Vec<CredentialGroup>) {
        self.groups = Some(Entry::fresh(groups));
    }

    /// Fresh credential list for a group
    #[must_use]
    pub fn credentials(&self, group_id: Uuid) -> Option<&[Credential]> {
        self.credentials
            .get(&group_id)
            .and_then(Entry::get)
            .map(Vec::as_slice)
    }

    /// Stores a freshly fetched credential list
    pub fn store_credentials(&mut self, group_id: Uuid, credentials: Vec<Credential>) {
        self.credentials
            .insert(group_id, Entry::fresh(credentials));
    }

    /// Marks the group forest stale
    pub fn invalidate_groups(&mut self) {
        if let Some(entry) = &mut self.groups {
            entry.stale = true;
        }
    }

    /// Marks one group's credential list stale
    pub fn invalidate_credentials(&mut self, group_id: Uuid) {
        if let Some(entry) = self.credentials.get_mut(&group_id) {
            entry.stale = true;
        }
    }

    /// Drops credential lists of groups that no longer exist
    pub fn forget_credentials<I: IntoIterator<Item = Uuid>>(&mut self, group_ids: I) {
        for id in group_ids {
            self.credentials.remove(&id);
        }
    }

    /// Marks every entry stale
    pub fn invalidate_all(&mut self) {
        self.invalidate_groups();
        for entry in self.credentials.values_mut() {
            entry.stale = true;
        }
    }

    /// Drops every entry
    pub fn clear(&mut self) {
        self.groups = None;
        self.credentials.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_invalidate_groups() {
        let mut cache = QueryCache::new();
        assert!(cache.groups().is_none());

        cache.store_groups(vec![CredentialGroup::new_root("A", Uuid::new_v4())]);
        assert_eq!(cache.groups().map(<[_]>::len), Some(1));

        cache.invalidate_groups();
        assert!(cache.groups().is_none());
        assert_eq!(cache.last_groups().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_credentials_are_per_group() {
        let mut cache = QueryCache::new();
        let (g1, g2) = (Uuid::new_v4(), Uuid::new_v4());
        cache.store_credentials(g1, vec![Credential::new("a", g1)]);
        cache.store_credentials(g2, vec![]);

        cache.invalidate_credentials(g1);
        assert!(cache.credentials(g1).is_none());
        assert!(cache.credentials(g2).is_some());

        cache.forget_credentials([g2]);
        assert!(cache.credentials(g2).is_none());
    }

    #[test]
    fn test_invalidate_all_and_clear() {
        let mut cache = QueryCache::new();
        let g = Uuid::new_v4();
        cache.store_groups(vec![]);
        cache.store_credentials(g, vec![]);

        cache.invalidate_all();
        assert!(cache.groups().is_none());
        assert!(cache.credentials(g).is_none());

        cache.clear();
        assert!(cache.last_groups().is_none());
    }
}
