//! Credential group types and their parameter schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{default_true, null_as_default};

/// Entry of the type catalog (`GET /credential-group-type`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupType {
    /// Unique identifier
    pub id: Uuid,
    /// Type name, also used as the key when creating groups
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Only active types may be chosen for new root groups
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GroupType {
    /// Creates an active type
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the same type marked inactive
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// One field of a type's credential form
/// (`GET /credential/parameter-list/{typeId}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    /// Unique identifier
    pub id: Uuid,
    /// Type this parameter belongs to
    #[serde(rename = "credentialGroupTypeId", default)]
    pub group_type_id: Option<Uuid>,
    /// Parameter key
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form metadata attached by the server
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Whether the parameter is in use
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ParameterDefinition {
    /// Creates an active definition for `group_type_id`
    #[must_use]
    pub fn new(name: impl Into<String>, group_type_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_type_id: Some(group_type_id),
            name: name.into(),
            data: None,
            is_active: true,
        }
    }

    /// Human-readable label derived from the key
    #[must_use]
    pub fn label(&self) -> String {
        title_case(&self.name)
    }
}

/// Converts `camelCase` or `snake_case` keys to "Title Case"
///
/// `"vpsServer"` becomes `"Vps Server"`, `"smtp_host"` becomes `"Smtp Host"`.
#[must_use]
pub fn title_case(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(if ch == '_' { ' ' } else { ch });
    }

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
