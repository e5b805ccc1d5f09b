//! Client configuration
//!
//! Settings live in `config.toml` inside the Closet configuration directory
//! and can be overridden per process through environment variables. The API
//! token is read from the file or the environment but never written back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{ConfigError, ConfigResult};

/// API base URL used when none is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3005";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Name of the settings file inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable naming the configuration directory
pub const ENV_CONFIG_DIR: &str = "CLOSET_CONFIG_DIR";
/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "CLOSET_API_URL";
/// Environment variable carrying the bearer token
pub const ENV_TOKEN: &str = "CLOSET_TOKEN";
/// Environment variable overriding the workspace
pub const ENV_WORKSPACE_ID: &str = "CLOSET_WORKSPACE_ID";

/// Settings for talking to the credential API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the REST API
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Workspace sent as the `workspace-id` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<Uuid>,
    /// Bearer token
    #[serde(skip_serializing, deserialize_with = "deserialize_token")]
    pub token: Option<SecretString>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            workspace_id: None,
            token: None,
        }
    }
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|token| !token.trim().is_empty())
        .map(SecretString::from))
}

impl ClientSettings {
    /// Resolves the configuration directory
    ///
    /// Order: explicit path, then `CLOSET_CONFIG_DIR`, then the platform
    /// config directory joined with `closet`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if no directory can be found.
    pub fn config_dir(explicit: Option<&Path>) -> ConfigResult<PathBuf> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join("closet"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Loads settings from the configuration directory and the environment
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// override is malformed.
    pub fn load(config_dir: Option<&Path>) -> ConfigResult<Self> {
        let _span = tracing::debug_span!(crate::tracing::span_names::CONFIG_LOAD).entered();
        let path = Self::config_dir(config_dir)?.join(CONFIG_FILE_NAME);

        let mut settings = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses a settings file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses settings from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid settings TOML.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies overrides looked up by environment variable name
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the workspace override is not a UUID.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(SecretString::from(token));
        }
        if let Some(workspace) = lookup(ENV_WORKSPACE_ID) {
            let id = workspace.trim().parse().map_err(|_| {
                ConfigError::Parse(format!("{ENV_WORKSPACE_ID} is not a UUID: {workspace}"))
            })?;
            self.workspace_id = Some(id);
        }
        Ok(())
    }

    /// Checks that the API URL is an absolute http(s) URL
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] otherwise.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|_| ConfigError::InvalidUrl(self.api_url.clone()))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ConfigError::InvalidUrl(self.api_url.clone()));
        }
        Ok(())
    }

    /// Writes the settings, without the token, to the configuration directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, config_dir: Option<&Path>) -> ConfigResult<PathBuf> {
        let _span = tracing::debug_span!(crate::tracing::span_names::CONFIG_SAVE).entered();
        let dir = Self::config_dir(config_dir)?;
        std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(CONFIG_FILE_NAME);
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Request timeout, falling back to the default for zero
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        let secs = if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout_secs
        };
        Duration::from_secs(secs)
    }

    /// Sets the API base URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Sets the workspace
    #[must_use]
    pub const fn with_workspace(mut self, workspace_id: Uuid) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }
}
