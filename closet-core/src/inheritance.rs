//! Type inheritance and creation-request validation
//!
//! Only root groups carry a type. Every sub-group inherits the type of its
//! root ancestor, which decides the parameter schema of its credentials and
//! the type name sent when creating further sub-groups beneath it.

use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::{
    CreateCredentialRequest, CreateGroupRequest, Credential, CredentialGroup, GroupType,
    INDEX_PARAMETER, ParameterDefinition, UpdateCredentialRequest,
};
use crate::tree::find_group_by_id;

/// Maximum length of group and credential names, in characters
pub const MAX_NAME_LEN: usize = 255;

/// Resolves the type that governs `group`
///
/// Roots return their own `type_id`. Sub-groups walk parent pointers up to
/// the root; a parent missing from `forest` or a loop in the chain yields
/// `None`.
#[must_use]
pub fn effective_type_id(group: &CredentialGroup, forest: &[CredentialGroup]) -> Option<Uuid> {
    let mut visited = HashSet::new();
    let mut current = group;

    while let Some(parent_id) = current.parent_id {
        if !visited.insert(current.id) {
            tracing::warn!(group_id = %group.id, "Cycle in group parent chain");
            return None;
        }
        current = find_group_by_id(forest, parent_id)?;
    }

    current.type_id
}

/// The set of group types offered by the server
#[derive(Debug, Clone, Default)]
pub struct GroupTypeCatalog {
    types: Vec<GroupType>,
}

impl GroupTypeCatalog {
    /// Wraps the list returned by `GET /credential-group-type`
    #[must_use]
    pub const fn new(types: Vec<GroupType>) -> Self {
        Self { types }
    }

    /// All types, active or not
    #[must_use]
    pub fn all(&self) -> &[GroupType] {
        &self.types
    }

    /// Types that may be chosen for a new root group
    pub fn active(&self) -> impl Iterator<Item = &GroupType> {
        self.types.iter().filter(|t| t.is_active)
    }

    /// Looks up a type by id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&GroupType> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Looks up a type by name, ignoring case
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&GroupType> {
        let name = name.trim();
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a type by id string or by name
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&GroupType> {
        key.trim()
            .parse::<Uuid>()
            .ok()
            .and_then(|id| self.get(id))
            .or_else(|| self.find_by_name(key))
    }

    /// Type governing `group`, resolved through its root ancestor
    #[must_use]
    pub fn effective_type(
        &self,
        group: &CredentialGroup,
        forest: &[CredentialGroup],
    ) -> Option<&GroupType> {
        effective_type_id(group, forest).and_then(|id| self.get(id))
    }

    /// Returns true if the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Trims a name and checks it against the length bounds
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for blank names and
/// [`ValidationError::TooLong`] past [`MAX_NAME_LEN`] characters.
pub fn validate_name(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// User input for a new group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGroup {
    /// Requested name
    pub name: String,
    /// Parent group; `None` creates a root
    pub parent_id: Option<Uuid>,
    /// Chosen type (id or name); only read for roots
    pub type_key: Option<String>,
}

impl NewGroup {
    /// Input for a root group of the given type
    #[must_use]
    pub fn root(name: impl Into<String>, type_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
            type_key: Some(type_key.into()),
        }
    }

    /// Input for a sub-group of `parent_id`
    #[must_use]
    pub fn child(name: impl Into<String>, parent_id: Uuid) -> Self {
        Self {
            name: name.into(),
            parent_id: Some(parent_id),
            type_key: None,
        }
    }

    /// Validates the input and builds the request body
    ///
    /// Roots must name an active type from `catalog`. Sub-groups ignore
    /// `type_key` and send the parent's effective type name instead.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first problem found.
    pub fn validate(
        &self,
        forest: &[CredentialGroup],
        catalog: &GroupTypeCatalog,
    ) -> Result<CreateGroupRequest, ValidationError> {
        let name = validate_name("name", &self.name)?;

        let type_name = match self.parent_id {
            None => {
                let key = self
                    .type_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .ok_or(ValidationError::TypeNotSelected)?;
                let group_type = catalog
                    .resolve(key)
                    .ok_or_else(|| ValidationError::UnknownType(key.to_string()))?;
                if !group_type.is_active {
                    return Err(ValidationError::InactiveType(group_type.name.clone()));
                }
                group_type.name.clone()
            }
            Some(parent_id) => {
                let parent = find_group_by_id(forest, parent_id)
                    .ok_or(ValidationError::ParentNotFound(parent_id))?;
                if self.type_key.is_some() {
                    tracing::debug!(%parent_id, "Ignoring type for sub-group, inherited from root");
                }
                catalog
                    .effective_type(parent, forest)
                    .map(|t| t.name.clone())
                    .ok_or(ValidationError::UnresolvedType(parent_id))?
            }
        };

        Ok(CreateGroupRequest {
            name,
            credential_group_type_name: type_name,
            parent_id: self.parent_id,
        })
    }
}

/// Parameter definitions shown on the credential form
///
/// The reserved `index` parameter is managed by ordering and never shown.
#[must_use]
pub fn form_fields(parameters: &[ParameterDefinition]) -> Vec<&ParameterDefinition> {
    parameters
        .iter()
        .filter(|p| p.name != INDEX_PARAMETER)
        .collect()
}

/// User input for a new credential
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCredential {
    /// Target group
    pub group_id: Uuid,
    /// Requested name
    pub name: String,
    /// Parameter values keyed by parameter name
    pub parameters: BTreeMap<String, String>,
}

impl NewCredential {
    /// Input with no parameters yet
    #[must_use]
    pub fn new(group_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            group_id,
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a parameter value
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Validates the input against the type's parameter schema
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReservedParameter`] if `index` was supplied,
    /// [`ValidationError::UnknownParameter`] for keys outside the schema and
    /// [`ValidationError::Required`] for blank names or schema fields.
    pub fn validate(
        &self,
        schema: &[ParameterDefinition],
    ) -> Result<CreateCredentialRequest, ValidationError> {
        let name = validate_name("name", &self.name)?;

        if self.parameters.contains_key(INDEX_PARAMETER) {
            return Err(ValidationError::ReservedParameter(
                INDEX_PARAMETER.to_string(),
            ));
        }

        let fields = form_fields(schema);
        if let Some(unknown) = self
            .parameters
            .keys()
            .find(|key| !fields.iter().any(|f| &f.name == *key))
        {
            return Err(ValidationError::UnknownParameter(unknown.clone()));
        }

        for field in &fields {
            let present = self
                .parameters
                .get(&field.name)
                .is_some_and(|v| !v.trim().is_empty());
            if !present {
                return Err(ValidationError::Required {
                    field: field.name.clone(),
                });
            }
        }

        Ok(CreateCredentialRequest {
            group_id: self.group_id,
            name,
            parameters: self.parameters.clone(),
        })
    }
}

/// User edits to an existing credential
///
/// Unset fields keep their stored value. Edited parameters are merged over
/// the stored ones before sending, so the reserved `index` survives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialUpdate {
    /// New name
    pub name: Option<String>,
    /// New active flag
    pub is_active: Option<bool>,
    /// Changed parameter values
    pub parameters: BTreeMap<String, String>,
}

impl CredentialUpdate {
    /// Update that only renames
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Update that only enables or disables
    #[must_use]
    pub const fn set_active(is_active: bool) -> Self {
        Self {
            name: None,
            is_active: Some(is_active),
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a changed parameter value
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Validates the edit and builds the request for `current`
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReservedParameter`] if `index` was supplied,
    /// [`ValidationError::UnknownParameter`] for keys outside the schema,
    /// [`ValidationError::Required`] for a blank name or blanked schema field
    /// and [`ValidationError::EmptyUpdate`] if nothing would change.
    pub fn validate(
        &self,
        schema: &[ParameterDefinition],
        current: &Credential,
    ) -> Result<UpdateCredentialRequest, ValidationError> {
        let name = self
            .name
            .as_deref()
            .map(|name| validate_name("name", name))
            .transpose()?;

        if self.parameters.contains_key(INDEX_PARAMETER) {
            return Err(ValidationError::ReservedParameter(
                INDEX_PARAMETER.to_string(),
            ));
        }

        let fields = form_fields(schema);
        for (key, value) in &self.parameters {
            if !fields.iter().any(|f| &f.name == key) {
                return Err(ValidationError::UnknownParameter(key.clone()));
            }
            if value.trim().is_empty() {
                return Err(ValidationError::Required { field: key.clone() });
            }
        }

        let parameters = if self.parameters.is_empty() {
            None
        } else {
            let mut merged = current.parameters.clone();
            merged.extend(self.parameters.clone());
            Some(merged)
        };

        let request = UpdateCredentialRequest {
            name,
            is_active: self.is_active,
            parameters,
        };
        if request.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        Ok(request)
    }
}
