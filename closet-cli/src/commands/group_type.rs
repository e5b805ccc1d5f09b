//! Group type inspection commands.

use std::path::Path;

use closet_core::models::GroupType;

use crate::cli::TypeCommands;
use crate::error::CliError;
use crate::util::{create_service, runtime};

/// Type command handler
pub fn cmd_type(config_path: Option<&Path>, subcmd: TypeCommands) -> Result<(), CliError> {
    match subcmd {
        TypeCommands::List { all } => cmd_type_list(config_path, all),
        TypeCommands::Params { group_type } => cmd_type_params(config_path, &group_type),
    }
}

fn cmd_type_list(config_path: Option<&Path>, all: bool) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let catalog = rt.block_on(service.load_catalog())?;
    let types: Vec<&GroupType> = if all {
        catalog.all().iter().collect()
    } else {
        catalog.active().collect()
    };

    if types.is_empty() {
        println!("No group types found.");
        return Ok(());
    }

    let name_width = types
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("{:<name_width$}  {:<8}  ID", "NAME", "STATUS");
    println!("{:-<name_width$}  {:-<8}  {:-<36}", "", "", "");
    for group_type in types {
        let status = if group_type.is_active {
            "active"
        } else {
            "inactive"
        };
        println!("{:<name_width$}  {status:<8}  {}", group_type.name, group_type.id);
    }

    Ok(())
}

fn cmd_type_params(config_path: Option<&Path>, key: &str) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let group_type = rt
        .block_on(service.load_catalog())?
        .resolve(key)
        .cloned()
        .ok_or_else(|| CliError::TypeNotFound(key.to_string()))?;
    let parameters = rt.block_on(service.parameters_for_type(group_type.id))?;
    let fields = closet_core::form_fields(parameters);

    println!("Parameters of '{}' ({}):", group_type.name, fields.len());
    for field in fields {
        let marker = if field.is_active { "" } else { " (inactive)" };
        println!("  {:<24} {}{marker}", field.name, field.label());
    }

    Ok(())
}
