//! Closet Core Library
//!
//! Client-side core of the Closet credential manager: the credential-group
//! hierarchy, type inheritance from root groups, stable credential ordering
//! and the REST client that persists them.
//!
//! # Crate Structure
//!
//! - [`models`] - Wire data structures (groups, credentials, types, workspaces)
//! - [`tree`] - Group forest queries, search filter and arena construction
//! - [`inheritance`] - Effective types and creation-request validation
//! - [`ordering`] - Dense credential indexes, optimistic reorder, push queue
//! - [`state`] - Selection, workspace scope and query cache
//! - [`api`] - `VaultApi` trait and its `reqwest` implementation
//! - [`service`] - Workflows tying validation, network and state together
//! - [`config`] - Client settings from TOML and the environment
//! - [`tracing`] - Structured logging setup

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod inheritance;
pub mod models;
pub mod ordering;
pub mod service;
pub mod state;
pub mod tracing;
pub mod tree;

pub use api::{HttpVaultApi, VaultApi};
pub use config::ClientSettings;
pub use error::{
    ApiError, ApiResult, ClosetError, ClosetResult, ConfigError, ConfigResult, OrderError,
    TreeError, ValidationError,
};
pub use inheritance::{
    CredentialUpdate, GroupTypeCatalog, MAX_NAME_LEN, NewCredential, NewGroup,
    effective_type_id, form_fields, validate_name,
};
pub use models::{
    CreateCredentialRequest, CreateGroupRequest, CreateWorkspaceRequest, Credential,
    CredentialGroup, CredentialOrderEntry, GroupType, INDEX_PARAMETER, ParameterDefinition,
    UpdateCredentialRequest, UpdateGroupRequest, UpdateOrderRequest, UpdateWorkspaceRequest,
    Workspace,
};
pub use ordering::{OrderedGroup, PushQueue};
pub use service::CredentialService;
pub use state::{QueryCache, Selection, Session};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
};
pub use tree::{DeleteImpact, GroupForest, filter_groups};
