//! Tracing setup for structured logging
//!
//! Service operations run inside spans named by [`span_names`] and record
//! fields named by [`field_names`], so log filters and dashboards can rely
//! on stable identifiers.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

static TRACING_CONFIG: OnceLock<TracingConfig> = OnceLock::new();

/// Crates whose events the default filter lets through
const OWN_TARGETS: [&str; 2] = ["closet_core", "closet_cli"];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// The subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),

    /// The custom filter string is malformed
    #[error("Invalid tracing filter: {0}")]
    InvalidFilter(String),

    /// Tracing was already initialized in this process
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// The log file could not be created
    #[error("Failed to create log file: {0}")]
    FileCreationFailed(String),
}

/// Result type for tracing operations
pub type TracingResult<T> = Result<T, TracingError>;

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    #[default]
    Warn,
    /// Adds informational messages
    Info,
    /// Adds debug messages
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// Converts to the `tracing` crate's level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Level for a `-v` count: none is warn, then info, debug and trace
    #[must_use]
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error, keeping stdout clean for command output
    #[default]
    Stderr,
    /// A log file, truncated on start
    File(PathBuf),
}

/// Configuration for tracing initialization
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Log level for Closet's own crates
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Custom `EnvFilter` directive, overrides `level` when set
    pub filter: Option<String>,
    /// Whether `RUST_LOG` may override the configured filter
    pub respect_env: bool,
}

impl TracingConfig {
    /// Creates a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Sets a custom filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Lets `RUST_LOG` take precedence
    #[must_use]
    pub const fn with_env_override(mut self, respect_env: bool) -> Self {
        self.respect_env = respect_env;
        self
    }

    /// Filter directive derived from the configuration
    #[must_use]
    pub fn directive(&self) -> String {
        self.filter.clone().unwrap_or_else(|| {
            OWN_TARGETS
                .iter()
                .map(|target| format!("{target}={}", self.level))
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    fn env_filter(&self) -> TracingResult<EnvFilter> {
        if self.respect_env {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return Ok(filter);
            }
        }
        EnvFilter::try_new(self.directive()).map_err(|e| TracingError::InvalidFilter(e.to_string()))
    }
}

/// Installs the global subscriber
///
/// Call once at startup; later calls fail with
/// [`TracingError::AlreadyInitialized`].
///
/// # Errors
///
/// Returns an error if tracing is already initialized, the filter is
/// malformed or the log file cannot be created.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    let filter = config.env_filter()?;
    let (writer, ansi) = match &config.output {
        TracingOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        TracingOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        TracingOutput::File(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| TracingError::FileCreationFailed(e.to_string()))?;
            (BoxMakeWriter::new(std::sync::Mutex::new(file)), false)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))?;

    let _ = TRACING_CONFIG.set(config.clone());
    tracing::debug!(level = %config.level, "Tracing initialized");
    Ok(())
}

/// Checks if tracing has been initialized
#[must_use]
pub fn is_tracing_initialized() -> bool {
    TRACING_INITIALIZED.load(Ordering::SeqCst)
}

/// Configuration passed to [`init_tracing`], if it succeeded
#[must_use]
pub fn get_tracing_config() -> Option<&'static TracingConfig> {
    TRACING_CONFIG.get()
}

/// Standard span names for Closet operations
pub mod span_names {
    /// Group forest fetch
    pub const GROUPS_REFRESH: &str = "groups.refresh";
    /// Search filter over the forest
    pub const GROUPS_FILTER: &str = "groups.filter";
    /// Group creation
    pub const GROUP_CREATE: &str = "group.create";
    /// Group rename or enable/disable
    pub const GROUP_UPDATE: &str = "group.update";
    /// Cascade group delete
    pub const GROUP_DELETE: &str = "group.delete";
    /// Credential list fetch
    pub const CREDENTIALS_LOAD: &str = "credentials.load";
    /// Credential order push
    pub const CREDENTIALS_REORDER: &str = "credentials.reorder";
    /// Credential creation
    pub const CREDENTIAL_CREATE: &str = "credential.create";
    /// Credential rename, enable/disable or parameter edit
    pub const CREDENTIAL_UPDATE: &str = "credential.update";
    /// Credential delete
    pub const CREDENTIAL_DELETE: &str = "credential.delete";
    /// Workspace create, rename, delete or default change
    pub const WORKSPACE_UPDATE: &str = "workspace.update";
    /// Type catalog fetch
    pub const TYPES_LOAD: &str = "types.load";
    /// Configuration load
    pub const CONFIG_LOAD: &str = "config.load";
    /// Configuration save
    pub const CONFIG_SAVE: &str = "config.save";
}

/// Standard field names for tracing spans
pub mod field_names {
    /// Group id
    pub const GROUP_ID: &str = "group_id";
    /// Parent group id
    pub const PARENT_ID: &str = "parent_id";
    /// Credential id
    pub const CREDENTIAL_ID: &str = "credential_id";
    /// Workspace id
    pub const WORKSPACE_ID: &str = "workspace_id";
    /// Group type name
    pub const TYPE_NAME: &str = "type_name";
    /// Search query
    pub const QUERY: &str = "query";
    /// Number of items returned or affected
    pub const ITEM_COUNT: &str = "item_count";
    /// HTTP status code
    pub const STATUS: &str = "status";
    /// Error message
    pub const ERROR: &str = "error";
}
