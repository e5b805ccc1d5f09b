//! Shared utility functions used across command modules.

use std::path::Path;

use closet_core::api::HttpVaultApi;
use closet_core::config::ClientSettings;
use closet_core::models::CredentialGroup;
use closet_core::service::CredentialService;
use closet_core::tree::{flatten, path_names};
use tokio::runtime::Runtime;

use crate::error::CliError;

/// Service type every command talks to
pub type Service = CredentialService<HttpVaultApi>;

/// Loads client settings from the optional config directory and the
/// environment.
pub fn load_settings(config_path: Option<&Path>) -> Result<ClientSettings, CliError> {
    ClientSettings::load(config_path).map_err(|e| CliError::Config(e.to_string()))
}

/// Creates the service for the configured API and workspace
pub fn create_service(config_path: Option<&Path>) -> Result<Service, CliError> {
    let settings = load_settings(config_path)?;
    tracing::debug!(
        api_url = %settings.api_url,
        workspace_id = ?settings.workspace_id,
        "Using credential API"
    );
    let api = HttpVaultApi::new(&settings)?;
    Ok(CredentialService::new(api, settings.workspace_id))
}

/// Creates the runtime that drives API calls
pub fn runtime() -> Result<Runtime, CliError> {
    Runtime::new().map_err(|e| CliError::Config(format!("Failed to create async runtime: {e}")))
}

/// Parse a key=value pair for credential parameters
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Find a group by name, slash-separated path or UUID
///
/// Returns the group without its children.
pub fn find_group(forest: &[CredentialGroup], key: &str) -> Result<CredentialGroup, CliError> {
    let groups = flatten(forest);
    let key = key.trim();

    // Try to find by UUID
    if let Ok(uuid) = uuid::Uuid::parse_str(key) {
        if let Some(group) = groups.iter().find(|g| g.id == uuid) {
            return Ok(group.clone());
        }
    }

    // Try to find by exact path, e.g. "Email/Personal"
    if key.contains('/') {
        let wanted = key.trim_matches('/').to_lowercase();
        return groups
            .into_iter()
            .find(|g| path_names(forest, g.id).is_some_and(|p| p.to_lowercase() == wanted))
            .ok_or_else(|| CliError::GroupNotFound(key.to_string()));
    }

    // Try exact then case-insensitive name match
    let matches: Vec<&CredentialGroup> = {
        let exact: Vec<_> = groups.iter().filter(|g| g.name == key).collect();
        if exact.is_empty() {
            groups
                .iter()
                .filter(|g| g.name.eq_ignore_ascii_case(key))
                .collect()
        } else {
            exact
        }
    };

    match matches.len() {
        0 => Err(CliError::GroupNotFound(key.to_string())),
        1 => Ok(matches[0].clone()),
        _ => {
            let paths: Vec<_> = matches
                .iter()
                .filter_map(|g| path_names(forest, g.id))
                .collect();
            Err(CliError::Validation(format!(
                "Ambiguous group name '{}'. Use a path: {}",
                key,
                paths.join(", ")
            )))
        }
    }
}

/// Asks a yes/no question on stdin, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    use std::io::Write as _;

    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
