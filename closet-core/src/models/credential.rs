//! Credential model and ordering payloads

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{default_true, null_as_default};

/// Reserved parameter holding a credential's position within its group
pub const INDEX_PARAMETER: &str = "index";

/// A secret stored in exactly one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Unique identifier
    pub id: Uuid,
    /// Owning group
    #[serde(rename = "credentialGroupId", default)]
    pub group_id: Option<Uuid>,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Whether the credential is enabled
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Type-defined parameters, including the reserved `index`
    #[serde(default, deserialize_with = "parameters_as_strings")]
    pub parameters: BTreeMap<String, String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Creates a credential in `group_id` with no parameters
    #[must_use]
    pub fn new(name: impl Into<String>, group_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id: Some(group_id),
            name: name.into(),
            is_active: true,
            parameters: BTreeMap::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets a parameter, returning the modified credential
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Sets the ordering index, returning the modified credential
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.set_index(index);
        self
    }

    /// Position of this credential within its group, if known
    ///
    /// Returns `None` when the parameter is missing or not a non-negative
    /// integer.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.parameters
            .get(INDEX_PARAMETER)
            .and_then(|value| value.trim().parse().ok())
    }

    /// Overwrites the ordering index
    pub fn set_index(&mut self, index: usize) {
        self.parameters
            .insert(INDEX_PARAMETER.to_string(), index.to_string());
    }

    /// Parameters the user may see and edit (everything except `index`)
    pub fn user_parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .filter(|(name, _)| name.as_str() != INDEX_PARAMETER)
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Accepts any JSON scalar as a parameter value.
///
/// The API types parameters as `record<unknown>`; numbers and booleans are
/// stored as their string form and `null` entries are dropped.
fn parameters_as_strings<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| {
            let value = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            Some((name, value))
        })
        .collect())
}

/// Body of `POST /credential`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCredentialRequest {
    /// Target group
    #[serde(rename = "credentialGroupId")]
    pub group_id: Uuid,
    /// Credential name
    pub name: String,
    /// Parameter values keyed by parameter name
    pub parameters: BTreeMap<String, String>,
}

/// Body of `PATCH /credential/{id}`
///
/// `parameters` replaces the stored map, so it must carry the reserved
/// `index` along with the edited values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentialRequest {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New active flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Full parameter map after the edit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,
}

impl UpdateCredentialRequest {
    /// Returns true if the request changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_active.is_none() && self.parameters.is_none()
    }
}

/// One entry of the authoritative order for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialOrderEntry {
    /// Credential being positioned
    pub credential_id: Uuid,
    /// Zero-based position
    pub index: usize,
}

/// Body of `PATCH /credential/group/{groupId}/order`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    /// Full order for the group
    pub credentials: Vec<CredentialOrderEntry>,
}
