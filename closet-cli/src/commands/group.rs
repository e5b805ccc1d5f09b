//! Group management commands.

use std::path::Path;

use closet_core::inheritance::{GroupTypeCatalog, NewGroup};
use closet_core::models::CredentialGroup;
use closet_core::tree::{find_group_by_id, flatten, path_names};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{GroupCommands, OutputFormat};
use crate::error::CliError;
use crate::format::{escape_csv_field, render_tree, truncate};
use crate::util::{confirm, create_service, find_group, runtime};

/// Group command handler
pub fn cmd_group(config_path: Option<&Path>, subcmd: GroupCommands) -> Result<(), CliError> {
    match subcmd {
        GroupCommands::List { format, search } => {
            cmd_group_list(config_path, format, search.as_deref())
        }
        GroupCommands::Tree { search } => cmd_group_tree(config_path, search.as_deref()),
        GroupCommands::Show { group } => cmd_group_show(config_path, &group),
        GroupCommands::Create {
            name,
            parent,
            group_type,
        } => cmd_group_create(config_path, &name, parent.as_deref(), group_type.as_deref()),
        GroupCommands::Rename { group, name } => cmd_group_rename(config_path, &group, &name),
        GroupCommands::Enable { group } => cmd_group_set_active(config_path, &group, true),
        GroupCommands::Disable { group } => cmd_group_set_active(config_path, &group, false),
        GroupCommands::Delete { group, yes } => cmd_group_delete(config_path, &group, yes),
    }
}

/// One line of `group list`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupRow {
    id: Uuid,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<Uuid>,
    group_type: String,
    credential_count: u32,
    is_active: bool,
}

fn group_rows(
    forest: &[CredentialGroup],
    full_forest: &[CredentialGroup],
    catalog: &GroupTypeCatalog,
) -> Vec<GroupRow> {
    flatten(forest)
        .into_iter()
        .map(|group| {
            let group_type = catalog
                .effective_type(&group, full_forest)
                .map(|t| t.name.clone())
                .or_else(|| group.type_name.clone())
                .unwrap_or_else(|| "-".to_string());
            GroupRow {
                id: group.id,
                path: path_names(full_forest, group.id)
                    .unwrap_or_else(|| group.display_name().to_string()),
                parent_id: group.parent_id,
                group_type,
                credential_count: group.total_credential_count.max(group.credential_count),
                is_active: group.is_active,
            }
        })
        .collect()
}

fn cmd_group_list(
    config_path: Option<&Path>,
    format: OutputFormat,
    search: Option<&str>,
) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let forest = rt.block_on(service.refresh_groups())?.to_vec();
    let visible = search.map_or_else(|| forest.clone(), |q| closet_core::filter_groups(&forest, q));
    let catalog = rt.block_on(service.ensure_catalog())?.clone();
    let rows = group_rows(&visible, &forest, &catalog);

    match format {
        OutputFormat::Table => print_group_table(&rows),
        OutputFormat::Json => print_group_json(&rows)?,
        OutputFormat::Csv => print_group_csv(&rows),
    }

    Ok(())
}

fn print_group_table(rows: &[GroupRow]) {
    if rows.is_empty() {
        println!("No groups found.");
        return;
    }

    let path_width = rows
        .iter()
        .map(|r| r.path.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 60);
    let type_width = rows
        .iter()
        .map(|r| r.group_type.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(
        "{:<path_width$}  {:<type_width$}  {:>5}  {:<8}  ID",
        "PATH", "TYPE", "CREDS", "STATUS"
    );
    println!(
        "{:-<path_width$}  {:-<type_width$}  {:-<5}  {:-<8}  {:-<36}",
        "", "", "", "", ""
    );

    for row in rows {
        let status = if row.is_active { "active" } else { "inactive" };
        println!(
            "{:<path_width$}  {:<type_width$}  {:>5}  {:<8}  {}",
            truncate(&row.path, path_width),
            row.group_type,
            row.credential_count,
            status,
            row.id
        );
    }
}

fn print_group_json(rows: &[GroupRow]) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| CliError::Config(format!("Failed to serialize: {e}")))?;
    println!("{json}");
    Ok(())
}

fn print_group_csv(rows: &[GroupRow]) {
    println!("id,path,parent_id,type,credentials,active");
    for row in rows {
        let path = escape_csv_field(&row.path);
        let group_type = escape_csv_field(&row.group_type);
        let parent = row.parent_id.map(|id| id.to_string()).unwrap_or_default();
        println!(
            "{},{path},{parent},{group_type},{},{}",
            row.id, row.credential_count, row.is_active
        );
    }
}

fn cmd_group_tree(config_path: Option<&Path>, search: Option<&str>) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let forest = match search {
        Some(query) => rt.block_on(service.search_groups(query))?,
        None => rt.block_on(service.refresh_groups())?.to_vec(),
    };

    if forest.is_empty() {
        println!("No groups found.");
    } else {
        print!("{}", render_tree(&forest));
    }
    Ok(())
}

fn cmd_group_show(config_path: Option<&Path>, key: &str) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let forest = rt.block_on(service.refresh_groups())?.to_vec();
    let found = find_group(&forest, key)?;
    let group = find_group_by_id(&forest, found.id).unwrap_or(&found);

    rt.block_on(service.select_group(group.id))?;
    let breadcrumb = service.session().selection().breadcrumb();
    let catalog = rt.block_on(service.ensure_catalog())?;
    let group_type = catalog
        .effective_type(group, &forest)
        .map_or_else(|| "(unresolved)".to_string(), |t| t.name.clone());

    println!("Group Details:");
    println!("  ID:          {}", group.id);
    println!("  Name:        {}", group.display_name());
    println!("  Path:        {breadcrumb}");
    println!(
        "  Type:        {group_type}{}",
        if group.is_root() { "" } else { " (inherited)" }
    );
    println!(
        "  Status:      {}",
        if group.is_active { "active" } else { "inactive" }
    );
    println!(
        "  Credentials: {} direct, {} total",
        group.credential_count, group.total_credential_count
    );

    if let Some(parent_id) = group.parent_id {
        let parent_name = find_group_by_id(&forest, parent_id)
            .map_or("(unknown)", CredentialGroup::display_name);
        println!("  Parent:      {parent_name} ({parent_id})");
    }
    if let Some(created) = group.created_at {
        println!("  Created:     {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    println!("\nSub-groups ({}):", group.children.len());
    for child in &group.children {
        println!("  - {} ({})", child.display_name(), child.id);
    }

    Ok(())
}

fn cmd_group_create(
    config_path: Option<&Path>,
    name: &str,
    parent: Option<&str>,
    group_type: Option<&str>,
) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let input = match parent {
        Some(parent_key) => {
            let forest = rt.block_on(service.refresh_groups())?.to_vec();
            let parent_group = find_group(&forest, parent_key)?;
            if group_type.is_some() {
                eprintln!(
                    "Note: sub-groups inherit the type of their root; --type is ignored"
                );
            }
            NewGroup::child(name, parent_group.id)
        }
        None => NewGroup {
            name: name.to_string(),
            parent_id: None,
            type_key: group_type.map(str::to_string),
        },
    };

    let created = rt.block_on(service.create_group(&input))?;
    println!(
        "Created group '{}' with ID {}",
        created.display_name(),
        created.id
    );

    Ok(())
}

fn cmd_group_rename(config_path: Option<&Path>, key: &str, name: &str) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let forest = rt.block_on(service.refresh_groups())?.to_vec();
    let group = find_group(&forest, key)?;
    let updated = rt.block_on(service.rename_group(group.id, name))?;

    println!(
        "Renamed group '{}' to '{}'",
        group.display_name(),
        updated.display_name()
    );
    Ok(())
}

fn cmd_group_set_active(
    config_path: Option<&Path>,
    key: &str,
    is_active: bool,
) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let forest = rt.block_on(service.refresh_groups())?.to_vec();
    let group = find_group(&forest, key)?;
    rt.block_on(service.set_group_active(group.id, is_active))?;

    let state = if is_active { "Enabled" } else { "Disabled" };
    println!("{state} group '{}'", group.display_name());
    Ok(())
}

fn cmd_group_delete(config_path: Option<&Path>, key: &str, yes: bool) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let forest = rt.block_on(service.refresh_groups())?.to_vec();
    let group = find_group(&forest, key)?;

    if !yes {
        let impact = rt.block_on(service.delete_impact(group.id))?;
        println!(
            "Deleting '{}' also removes {} sub-group(s) and {} credential(s).",
            group.display_name(),
            impact.sub_groups,
            impact.credentials
        );
        if !confirm("Continue?")? {
            return Err(CliError::Cancelled);
        }
    }

    let removed = rt.block_on(service.delete_group(group.id))?;
    println!(
        "Deleted group '{}' ({} group(s) removed)",
        group.display_name(),
        removed.len()
    );
    Ok(())
}
