//! Workspace model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{default_true, null_as_default};

/// Tenant scoping all groups and credentials
///
/// The core treats a workspace as an opaque id sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Whether the workspace is enabled
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Whether this is the account's default workspace
    #[serde(default)]
    pub is_default: bool,
}

/// Body of `POST /workspace`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkspaceRequest {
    /// Workspace name
    pub name: String,
}

/// Body of `PATCH /workspace/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkspaceRequest {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New active flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateWorkspaceRequest {
    /// Request that only renames the workspace
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_active: None,
        }
    }
}
