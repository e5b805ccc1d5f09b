//! Depth-first queries over a nested group forest

use std::borrow::Borrow;
use std::collections::HashSet;

use uuid::Uuid;

use crate::models::CredentialGroup;

/// Finds a group anywhere in the forest
///
/// Depth-first, pre-order; the first match wins.
#[must_use]
pub fn find_group_by_id(forest: &[CredentialGroup], id: Uuid) -> Option<&CredentialGroup> {
    for group in forest {
        if group.id == id {
            return Some(group);
        }
        if let Some(found) = find_group_by_id(&group.children, id) {
            return Some(found);
        }
    }
    None
}

/// Builds the chain of groups from a root down to `target`
///
/// The last element is the target itself. Returns `None` if the target is
/// not in the forest.
#[must_use]
pub fn build_path(forest: &[CredentialGroup], target: Uuid) -> Option<Vec<&CredentialGroup>> {
    let mut path = Vec::new();
    collect_path(forest, target, &mut path).then_some(path)
}

fn collect_path<'a>(
    forest: &'a [CredentialGroup],
    target: Uuid,
    path: &mut Vec<&'a CredentialGroup>,
) -> bool {
    for group in forest {
        path.push(group);
        if group.id == target || collect_path(&group.children, target, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Returns true if `target` is `ancestor` or lies in its subtree
///
/// Used to decide whether deleting `ancestor` invalidates the current
/// selection. Equal ids always match, even when neither is in the forest.
#[must_use]
pub fn is_descendant_or_self(forest: &[CredentialGroup], ancestor: Uuid, target: Uuid) -> bool {
    if ancestor == target {
        return true;
    }
    find_group_by_id(forest, ancestor)
        .is_some_and(|group| find_group_by_id(&group.children, target).is_some())
}

/// Ids of every group on `path` except the last one
///
/// The selected group is not expanded by selection; its ancestors are.
#[must_use]
pub fn expanded_ancestors<G: Borrow<CredentialGroup>>(path: &[G]) -> HashSet<Uuid> {
    match path.split_last() {
        Some((_, ancestors)) => ancestors.iter().map(|g| g.borrow().id).collect(),
        None => HashSet::new(),
    }
}

/// Breadcrumb string for a group, e.g. `"Production/Web Servers"`
#[must_use]
pub fn path_names(forest: &[CredentialGroup], target: Uuid) -> Option<String> {
    build_path(forest, target).map(|path| {
        path.iter()
            .map(|g| g.display_name())
            .collect::<Vec<_>>()
            .join("/")
    })
}

/// Ids of `id` and all of its descendants, pre-order
///
/// Empty if `id` is not in the forest.
#[must_use]
pub fn subtree_ids(forest: &[CredentialGroup], id: Uuid) -> Vec<Uuid> {
    let mut ids = Vec::new();
    if let Some(group) = find_group_by_id(forest, id) {
        let mut stack = vec![group];
        while let Some(current) = stack.pop() {
            ids.push(current.id);
            stack.extend(current.children.iter().rev());
        }
    }
    ids
}

/// Ids of every group below `id`, excluding `id` itself
#[must_use]
pub fn descendant_ids(forest: &[CredentialGroup], id: Uuid) -> Vec<Uuid> {
    subtree_ids(forest, id).into_iter().skip(1).collect()
}

/// What a cascade delete of one group would remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteImpact {
    /// The group itself plus every descendant group
    pub groups: usize,
    /// Sub-groups only (excluding the deleted group)
    pub sub_groups: usize,
    /// Credentials in the group and all descendants
    pub credentials: u32,
}

/// Computes the impact of deleting `id`, for confirmation prompts
#[must_use]
pub fn delete_impact(forest: &[CredentialGroup], id: Uuid) -> Option<DeleteImpact> {
    let group = find_group_by_id(forest, id)?;
    let groups = subtree_ids(forest, id).len();
    Some(DeleteImpact {
        groups,
        sub_groups: groups.saturating_sub(1),
        credentials: group.total_credential_count.max(group.credential_count),
    })
}

/// Flattens a nested forest into a pre-order list without children
///
/// A nested child that carries no parent pointer gets the enclosing group's
/// id; an explicit parent pointer is kept as sent.
#[must_use]
pub fn flatten(forest: &[CredentialGroup]) -> Vec<CredentialGroup> {
    let mut flat = Vec::new();
    flatten_into(forest, None, &mut flat);
    flat
}

fn flatten_into(
    forest: &[CredentialGroup],
    enclosing: Option<Uuid>,
    flat: &mut Vec<CredentialGroup>,
) {
    for group in forest {
        let mut node = group.shallow_clone();
        if node.parent_id.is_none() {
            node.parent_id = enclosing;
        }
        flat.push(node);
        flatten_into(&group.children, Some(group.id), flat);
    }
}
