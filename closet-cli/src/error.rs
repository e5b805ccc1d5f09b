//! CLI error types and exit codes.

use closet_core::error::{ApiError, ClosetError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other local errors
    pub const GENERAL_ERROR: i32 = 1;
    /// API failure - the server could not be reached or rejected the request
    pub const API_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before anything was sent
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Group not found by name or id
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Group type not found by name or id
    #[error("Group type not found: {0}")]
    TypeNotFound(String),

    /// Credential not found by name or id within its group
    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    /// Workspace not found by name or id
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// Reorder request out of range
    #[error("Order error: {0}")]
    Order(String),

    /// REST call failed
    #[error("API error: {0}")]
    Api(String),

    /// Operation cancelled by the user
    #[error("Cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ClosetError> for CliError {
    fn from(err: ClosetError) -> Self {
        match err {
            ClosetError::Validation(e) => Self::Validation(e.to_string()),
            ClosetError::Api(e) => e.into(),
            ClosetError::Tree(e) => Self::Api(format!("malformed group hierarchy: {e}")),
            ClosetError::Order(e) => Self::Order(e.to_string()),
            ClosetError::Config(e) => Self::Config(e.to_string()),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Api(err.to_string())
    }
}

impl From<closet_core::error::ConfigError> for CliError {
    fn from(err: closet_core::error::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, validation, lookup, IO)
    /// - 2: API failure (transport, authorization, server-side rejection)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Api(_) => exit_codes::API_FAILURE,
            Self::Config(_)
            | Self::Validation(_)
            | Self::GroupNotFound(_)
            | Self::TypeNotFound(_)
            | Self::CredentialNotFound(_)
            | Self::WorkspaceNotFound(_)
            | Self::Order(_)
            | Self::Cancelled
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
