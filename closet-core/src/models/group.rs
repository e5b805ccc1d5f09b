//! Credential group model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{default_true, null_as_default};

/// A named container for credentials and nested sub-groups
///
/// Groups form a forest per workspace: a group whose `parent_id` is `None` is
/// a root and carries the type that every descendant inherits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialGroup {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Type of the group; only meaningful on roots
    #[serde(rename = "credentialGroupTypeId", default)]
    pub type_id: Option<Uuid>,
    /// Type name as reported by the server, for display
    #[serde(
        rename = "credentialGroupTypeName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub type_name: Option<String>,
    /// Parent group; `None` for roots
    #[serde(rename = "credentialGroupId", default)]
    pub parent_id: Option<Uuid>,
    /// Owning workspace
    #[serde(default)]
    pub workspace_id: Uuid,
    /// Whether the group is enabled
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Credentials directly in this group
    #[serde(default)]
    pub credential_count: u32,
    /// Credentials in this group and all descendants
    #[serde(default)]
    pub total_credential_count: u32,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Nested sub-groups
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<CredentialGroup>,
}

impl CredentialGroup {
    /// Creates a new root group with the given type
    #[must_use]
    pub fn new_root(name: impl Into<String>, type_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            type_id: Some(type_id),
            type_name: None,
            parent_id: None,
            workspace_id: Uuid::nil(),
            is_active: true,
            credential_count: 0,
            total_credential_count: 0,
            created_at: None,
            updated_at: None,
            children: Vec::new(),
        }
    }

    /// Creates a new sub-group under `parent_id`
    ///
    /// Sub-groups carry no type of their own.
    #[must_use]
    pub fn with_parent(name: impl Into<String>, parent_id: Uuid) -> Self {
        Self {
            type_id: None,
            parent_id: Some(parent_id),
            ..Self::new_root(name, Uuid::nil())
        }
    }

    /// Replaces the children, re-pointing each child at this group
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children
            .into_iter()
            .map(|mut child| {
                child.parent_id = Some(self.id);
                child
            })
            .collect();
        self
    }

    /// Sets the direct and total credential counts
    #[must_use]
    pub const fn with_counts(mut self, direct: u32, total: u32) -> Self {
        self.credential_count = direct;
        self.total_credential_count = total;
        self
    }

    /// Returns true if this group has no parent
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns true if this group has nested sub-groups
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Copies the group without its children
    #[must_use]
    pub fn shallow_clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            type_id: self.type_id,
            type_name: self.type_name.clone(),
            parent_id: self.parent_id,
            workspace_id: self.workspace_id,
            is_active: self.is_active,
            credential_count: self.credential_count,
            total_credential_count: self.total_credential_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
            children: Vec::new(),
        }
    }

    /// Name used for display, with a placeholder for unnamed groups
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Unnamed Group"
        } else {
            &self.name
        }
    }
}

/// Body of `POST /credential-group`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    /// Group name
    pub name: String,
    /// Name of the group type (the root's type for sub-groups)
    pub credential_group_type_name: String,
    /// Parent group for sub-groups
    #[serde(rename = "credentialGroupId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

/// Body of `PATCH /credential-group/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New active flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateGroupRequest {
    /// Request that only renames the group
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_active: None,
        }
    }

    /// Request that only toggles the active flag
    #[must_use]
    pub const fn set_active(is_active: bool) -> Self {
        Self {
            name: None,
            is_active: Some(is_active),
        }
    }

    /// Returns true if the request changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_active.is_none()
    }
}
