//! Workspace commands.

use std::path::Path;

use closet_core::config::{CONFIG_FILE_NAME, ClientSettings};
use closet_core::models::Workspace;

use crate::cli::WorkspaceCommands;
use crate::error::CliError;
use crate::util::{Service, confirm, create_service, load_settings, runtime};

/// Workspace command handler
pub fn cmd_workspace(
    config_path: Option<&Path>,
    subcmd: WorkspaceCommands,
) -> Result<(), CliError> {
    match subcmd {
        WorkspaceCommands::List => cmd_workspace_list(config_path),
        WorkspaceCommands::Use { workspace } => cmd_workspace_use(config_path, &workspace),
        WorkspaceCommands::Create { name } => cmd_workspace_create(config_path, &name),
        WorkspaceCommands::Rename { workspace, name } => {
            cmd_workspace_rename(config_path, &workspace, &name)
        }
        WorkspaceCommands::Default { workspace } => {
            cmd_workspace_default(config_path, &workspace)
        }
        WorkspaceCommands::Delete { workspace, yes } => {
            cmd_workspace_delete(config_path, &workspace, yes)
        }
    }
}

fn fetch_workspaces(config_path: Option<&Path>) -> Result<Vec<Workspace>, CliError> {
    let service = create_service(config_path)?;
    let rt = runtime()?;
    Ok(rt.block_on(service.workspaces())?)
}

fn cmd_workspace_list(config_path: Option<&Path>) -> Result<(), CliError> {
    let current = load_settings(config_path)?.workspace_id;
    let workspaces = fetch_workspaces(config_path)?;

    if workspaces.is_empty() {
        println!("No workspaces found.");
        return Ok(());
    }

    let name_width = workspaces
        .iter()
        .map(|w| w.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("   {:<name_width$}  ID", "NAME");
    println!("   {:-<name_width$}  {:-<36}", "", "");
    for workspace in &workspaces {
        let marker = if current == Some(workspace.id) { "*" } else { " " };
        let mut flags = String::new();
        if workspace.is_default {
            flags.push_str(" (default)");
        }
        if !workspace.is_active {
            flags.push_str(" (inactive)");
        }
        println!(
            " {marker} {:<name_width$}  {}{flags}",
            workspace.name, workspace.id
        );
    }

    Ok(())
}

/// Finds a workspace by ID, exact name or case-insensitive name
fn find_workspace<'a>(workspaces: &'a [Workspace], key: &str) -> Result<&'a Workspace, CliError> {
    let key = key.trim();
    if let Ok(id) = key.parse::<uuid::Uuid>() {
        if let Some(workspace) = workspaces.iter().find(|w| w.id == id) {
            return Ok(workspace);
        }
    }
    workspaces
        .iter()
        .find(|w| w.name == key)
        .or_else(|| workspaces.iter().find(|w| w.name.eq_ignore_ascii_case(key)))
        .ok_or_else(|| CliError::WorkspaceNotFound(key.to_string()))
}

/// Settings from the config file alone, so environment overrides are not
/// persisted when saving
fn file_settings(config_path: Option<&Path>) -> Result<ClientSettings, CliError> {
    let path = ClientSettings::config_dir(config_path)?.join(CONFIG_FILE_NAME);
    if path.exists() {
        Ok(ClientSettings::load_from_file(&path)?)
    } else {
        Ok(ClientSettings::default())
    }
}

/// Service plus the workspace `key` resolves to
fn resolve_workspace(
    config_path: Option<&Path>,
    key: &str,
) -> Result<(Service, tokio::runtime::Runtime, Workspace), CliError> {
    let service = create_service(config_path)?;
    let rt = runtime()?;
    let workspaces = rt.block_on(service.workspaces())?;
    let workspace = find_workspace(&workspaces, key)?.clone();
    Ok((service, rt, workspace))
}

fn cmd_workspace_use(config_path: Option<&Path>, key: &str) -> Result<(), CliError> {
    let workspaces = fetch_workspaces(config_path)?;
    let workspace = find_workspace(&workspaces, key)?;

    let mut settings = file_settings(config_path)?;
    settings.workspace_id = Some(workspace.id);
    let saved = settings.save(config_path)?;

    println!(
        "Using workspace '{}' ({}), saved to {}",
        workspace.name,
        workspace.id,
        saved.display()
    );
    Ok(())
}

fn cmd_workspace_create(config_path: Option<&Path>, name: &str) -> Result<(), CliError> {
    let service = create_service(config_path)?;
    let rt = runtime()?;

    let created = rt.block_on(service.create_workspace(name))?;
    println!("Created workspace '{}' (ID {})", created.name, created.id);
    Ok(())
}

fn cmd_workspace_rename(config_path: Option<&Path>, key: &str, name: &str) -> Result<(), CliError> {
    let (service, rt, workspace) = resolve_workspace(config_path, key)?;

    let renamed = rt.block_on(service.rename_workspace(workspace.id, name))?;
    println!("Renamed workspace '{}' to '{}'", workspace.name, renamed.name);
    Ok(())
}

fn cmd_workspace_default(config_path: Option<&Path>, key: &str) -> Result<(), CliError> {
    let (service, rt, workspace) = resolve_workspace(config_path, key)?;

    rt.block_on(service.set_default_workspace(workspace.id))?;
    println!("Workspace '{}' is now the default", workspace.name);
    Ok(())
}

fn cmd_workspace_delete(config_path: Option<&Path>, key: &str, yes: bool) -> Result<(), CliError> {
    let (mut service, rt, workspace) = resolve_workspace(config_path, key)?;

    if !yes {
        println!(
            "Deleting workspace '{}' removes all of its groups and credentials.",
            workspace.name
        );
        if !confirm("Continue?")? {
            return Err(CliError::Cancelled);
        }
    }

    let was_current = rt.block_on(service.delete_workspace(workspace.id))?;
    println!("Deleted workspace '{}'", workspace.name);

    if was_current {
        let mut settings = file_settings(config_path)?;
        if settings.workspace_id == Some(workspace.id) {
            settings.workspace_id = None;
            settings.save(config_path)?;
            println!("Cleared the saved workspace; run 'workspace use' to pick another.");
        }
    }
    Ok(())
}
