//! Data models exchanged with the credential REST API
//!
//! Field names follow the wire format (`camelCase`, `credentialGroupId` for the
//! parent pointer); Rust-side names describe what the field means.

mod credential;
mod group;
mod group_type;
mod workspace;

pub use credential::{
    CreateCredentialRequest, Credential, CredentialOrderEntry, INDEX_PARAMETER,
    UpdateCredentialRequest, UpdateOrderRequest,
};
pub use group::{CreateGroupRequest, CredentialGroup, UpdateGroupRequest};
pub use group_type::{GroupType, ParameterDefinition, title_case};
pub use workspace::{CreateWorkspaceRequest, UpdateWorkspaceRequest, Workspace};

use serde::{Deserialize, Deserializer};

/// Deserializes `null` as the type's default value.
///
/// The API sends `null` for empty names and empty child lists.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) const fn default_true() -> bool {
    true
}
