//! Error types for the Closet core library
//!
//! Each concern has its own `thiserror` enum; [`ClosetError`] aggregates them
//! for callers that drive whole workflows (the service layer and the CLI).

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Client-side validation failures, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty or missing
    #[error("{field} is required")]
    Required {
        /// Name of the offending field
        field: String,
    },

    /// A field exceeded its maximum length
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Name of the offending field
        field: String,
        /// Maximum number of characters
        max: usize,
    },

    /// A root group was submitted without a type
    #[error("a type must be selected for a root group")]
    TypeNotSelected,

    /// The chosen type does not exist in the catalog
    #[error("unknown credential group type: {0}")]
    UnknownType(String),

    /// The chosen type exists but is disabled
    #[error("credential group type '{0}' is not active")]
    InactiveType(String),

    /// The parent group is not present in the loaded forest
    #[error("parent group {0} not found")]
    ParentNotFound(Uuid),

    /// The target group is not present in the loaded forest
    #[error("group {0} not found")]
    GroupNotFound(Uuid),

    /// The credential is not in the group's loaded list
    #[error("credential {0} not found")]
    CredentialNotFound(Uuid),

    /// An update request carried no changes
    #[error("nothing to update")]
    EmptyUpdate,

    /// The parent's effective type could not be resolved
    #[error("cannot resolve the type of group {0}")]
    UnresolvedType(Uuid),

    /// The user tried to set a reserved parameter
    #[error("parameter '{0}' is reserved and cannot be edited")]
    ReservedParameter(String),

    /// A parameter is not part of the type's schema
    #[error("parameter '{0}' is not defined for this type")]
    UnknownParameter(String),
}

/// Errors returned by the REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// The server rejected the credentials (401/403)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The referenced resource does not exist (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("API error {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The configured base URL could not be joined with a path
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl ApiError {
    /// Returns true if the error means the resource is already gone
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors raised while building a group forest from parent pointers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Following parent pointers from this group loops back on itself
    #[error("group hierarchy contains a cycle through {0}")]
    Cycle(Uuid),

    /// The group names itself as its parent
    #[error("group {0} is its own parent")]
    SelfParent(Uuid),

    /// The same id appears twice in the input
    #[error("duplicate group id {0}")]
    DuplicateId(Uuid),
}

/// Errors from credential ordering operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// A move position lies outside the list
    #[error("position {position} is out of range for {len} credentials")]
    OutOfRange {
        /// Requested position
        position: usize,
        /// Length of the list
        len: usize,
    },

    /// No ordering state is tracked for this group
    #[error("no credential order loaded for group {0}")]
    UnknownGroup(Uuid),
}

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("config file {path}: {source}")]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Serializing the settings failed
    #[error("failed to serialize config: {0}")]
    Serialize(String),

    /// The API URL is not an absolute http(s) URL
    #[error("invalid API URL '{0}'")]
    InvalidUrl(String),

    /// No configuration directory could be determined
    #[error("could not determine the configuration directory")]
    NoConfigDir,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for REST client operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Top-level error for workflows that span several concerns.
#[derive(Debug, Error)]
pub enum ClosetError {
    /// Input rejected before reaching the network
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// REST call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Malformed group hierarchy
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Invalid reorder request
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for workflow operations
pub type ClosetResult<T> = Result<T, ClosetError>;
