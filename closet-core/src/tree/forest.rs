//! Arena-backed group forest built from parent pointers
//!
//! The API returns groups pre-nested, but nesting is only as trustworthy as
//! the server. `GroupForest` rebuilds the hierarchy from each group's
//! `parent_id`, rejecting self-parenting and cycles, so every traversal over
//! it terminates.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::TreeError;
use crate::models::CredentialGroup;

use super::query::flatten;

/// Visit state used by cycle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// A validated forest of groups stored in an arena
#[derive(Debug, Clone, Default)]
pub struct GroupForest {
    /// Groups without children, in input order
    nodes: Vec<CredentialGroup>,
    /// Group id to arena index
    index: HashMap<Uuid, usize>,
    /// Parent arena index per node
    parents: Vec<Option<usize>>,
    /// Child arena indices per node, in input order
    children: Vec<Vec<usize>>,
    /// Arena indices of root groups, in input order
    roots: Vec<usize>,
}

impl GroupForest {
    /// Builds a forest from a flat list with parent pointers
    ///
    /// Groups whose parent is not in the list are promoted to roots.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateId`] if an id repeats,
    /// [`TreeError::SelfParent`] if a group is its own parent and
    /// [`TreeError::Cycle`] if parent pointers loop.
    pub fn from_flat(groups: Vec<CredentialGroup>) -> Result<Self, TreeError> {
        let mut index = HashMap::with_capacity(groups.len());
        let nodes: Vec<CredentialGroup> = groups
            .into_iter()
            .map(|mut group| {
                group.children.clear();
                group
            })
            .collect();

        for (i, group) in nodes.iter().enumerate() {
            if index.insert(group.id, i).is_some() {
                return Err(TreeError::DuplicateId(group.id));
            }
        }

        let mut parents = Vec::with_capacity(nodes.len());
        for group in &nodes {
            let parent = match group.parent_id {
                Some(parent_id) if parent_id == group.id => {
                    return Err(TreeError::SelfParent(group.id));
                }
                Some(parent_id) => {
                    let parent = index.get(&parent_id).copied();
                    if parent.is_none() {
                        tracing::warn!(
                            group_id = %group.id,
                            parent_id = %parent_id,
                            "Parent group missing, treating group as root"
                        );
                    }
                    parent
                }
                None => None,
            };
            parents.push(parent);
        }

        detect_cycles(&nodes, &parents)?;

        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            match parent {
                Some(p) => children[*p].push(i),
                None => roots.push(i),
            }
        }

        Ok(Self {
            nodes,
            index,
            parents,
            children,
            roots,
        })
    }

    /// Validates a nested API payload by flattening and rebuilding it
    ///
    /// # Errors
    ///
    /// Same as [`GroupForest::from_flat`].
    pub fn from_nested(forest: &[CredentialGroup]) -> Result<Self, TreeError> {
        Self::from_flat(flatten(forest))
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the forest has no groups
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a group by id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&CredentialGroup> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Returns true if the group is present
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    /// Parent of a group, `None` for roots and unknown ids
    #[must_use]
    pub fn parent(&self, id: Uuid) -> Option<&CredentialGroup> {
        let i = *self.index.get(&id)?;
        self.parents[i].map(|p| &self.nodes[p])
    }

    /// Direct children of a group
    #[must_use]
    pub fn children(&self, id: Uuid) -> Vec<&CredentialGroup> {
        self.index
            .get(&id)
            .map(|&i| self.children[i].iter().map(|&c| &self.nodes[c]).collect())
            .unwrap_or_default()
    }

    /// Root groups in input order
    #[must_use]
    pub fn roots(&self) -> Vec<&CredentialGroup> {
        self.roots.iter().map(|&i| &self.nodes[i]).collect()
    }

    /// All groups in input order
    pub fn iter(&self) -> impl Iterator<Item = &CredentialGroup> {
        self.nodes.iter()
    }

    /// Ancestors of a group, nearest first, excluding the group itself
    #[must_use]
    pub fn ancestors(&self, id: Uuid) -> Vec<&CredentialGroup> {
        let mut result = Vec::new();
        let mut current = self.index.get(&id).and_then(|&i| self.parents[i]);
        while let Some(i) = current {
            result.push(&self.nodes[i]);
            current = self.parents[i];
        }
        result
    }

    /// Chain from the root down to the group, inclusive
    #[must_use]
    pub fn path(&self, id: Uuid) -> Option<Vec<&CredentialGroup>> {
        let group = self.get(id)?;
        let mut path = self.ancestors(id);
        path.reverse();
        path.push(group);
        Some(path)
    }

    /// Root ancestor of a group (the group itself for roots)
    #[must_use]
    pub fn root_of(&self, id: Uuid) -> Option<&CredentialGroup> {
        let group = self.get(id)?;
        Some(self.ancestors(id).pop().unwrap_or(group))
    }

    /// Breadcrumb string for a group, e.g. `"Production/Web Servers"`
    #[must_use]
    pub fn path_names(&self, id: Uuid) -> Option<String> {
        self.path(id).map(|path| {
            path.iter()
                .map(|g| g.display_name())
                .collect::<Vec<_>>()
                .join("/")
        })
    }

    /// Depth of a group, zero for roots
    #[must_use]
    pub fn depth(&self, id: Uuid) -> Option<usize> {
        self.contains(id).then(|| self.ancestors(id).len())
    }

    /// Rebuilds the nested representation used by the API and renderers
    #[must_use]
    pub fn to_nested(&self) -> Vec<CredentialGroup> {
        self.roots.iter().map(|&i| self.nest(i)).collect()
    }

    fn nest(&self, i: usize) -> CredentialGroup {
        let mut group = self.nodes[i].clone();
        group.children = self.children[i].iter().map(|&c| self.nest(c)).collect();
        group
    }
}

/// Walks parent chains, failing on the first loop found
fn detect_cycles(nodes: &[CredentialGroup], parents: &[Option<usize>]) -> Result<(), TreeError> {
    let mut marks = vec![Mark::Unvisited; nodes.len()];

    for start in 0..nodes.len() {
        let mut chain = Vec::new();
        let mut current = Some(start);

        while let Some(i) = current {
            match marks[i] {
                Mark::Done => break,
                Mark::InProgress => return Err(TreeError::Cycle(nodes[i].id)),
                Mark::Unvisited => {
                    marks[i] = Mark::InProgress;
                    chain.push(i);
                    current = parents[i];
                }
            }
        }

        for i in chain {
            marks[i] = Mark::Done;
        }
    }

    Ok(())
}
