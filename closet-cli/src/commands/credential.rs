//! Credential management commands.

use std::collections::BTreeMap;
use std::path::Path;

use closet_core::inheritance::{CredentialUpdate, NewCredential};
use closet_core::models::Credential;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{CredentialCommands, OutputFormat};
use crate::error::CliError;
use crate::format::{escape_csv_field, truncate};
use crate::util::{Service, create_service, find_group, runtime};

/// Credential command handler
pub fn cmd_credential(
    config_path: Option<&Path>,
    subcmd: CredentialCommands,
) -> Result<(), CliError> {
    match subcmd {
        CredentialCommands::List { group, format } => {
            cmd_credential_list(config_path, &group, format)
        }
        CredentialCommands::Add {
            group,
            name,
            params,
        } => cmd_credential_add(config_path, &group, &name, params),
        CredentialCommands::Update {
            group,
            credential,
            name,
            params,
        } => {
            let update = params.into_iter().fold(
                CredentialUpdate {
                    name,
                    ..CredentialUpdate::default()
                },
                |update, (k, v)| update.with_parameter(k, v),
            );
            cmd_credential_update(config_path, &group, &credential, &update)
        }
        CredentialCommands::Enable { group, credential } => cmd_credential_update(
            config_path,
            &group,
            &credential,
            &CredentialUpdate::set_active(true),
        ),
        CredentialCommands::Disable { group, credential } => cmd_credential_update(
            config_path,
            &group,
            &credential,
            &CredentialUpdate::set_active(false),
        ),
        CredentialCommands::Delete { id, group } => {
            cmd_credential_delete(config_path, id, group.as_deref())
        }
        CredentialCommands::Move { group, from, to } => {
            cmd_credential_move(config_path, &group, from, to)
        }
    }
}

/// One line of `credential list`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRow {
    position: usize,
    id: Uuid,
    name: String,
    is_active: bool,
    parameters: BTreeMap<String, String>,
}

fn credential_rows(credentials: &[Credential]) -> Vec<CredentialRow> {
    credentials
        .iter()
        .enumerate()
        .map(|(position, credential)| CredentialRow {
            position,
            id: credential.id,
            name: credential.name.clone(),
            is_active: credential.is_active,
            parameters: credential
                .user_parameters()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
        .collect()
}

/// Resolves `key`, selects the group and loads its credentials in order
fn load_selected(
    service: &mut Service,
    rt: &tokio::runtime::Runtime,
    key: &str,
) -> Result<(Uuid, String, Vec<Credential>), CliError> {
    let forest = rt.block_on(service.refresh_groups())?.to_vec();
    let group = find_group(&forest, key)?;
    rt.block_on(service.select_group(group.id))?;
    rt.block_on(service.load_credentials(group.id))?;

    let credentials = service
        .displayed_credentials(group.id)
        .map(<[Credential]>::to_vec)
        .unwrap_or_default();
    Ok((group.id, service.session().selection().breadcrumb(), credentials))
}

fn cmd_credential_list(
    config_path: Option<&Path>,
    key: &str,
    format: OutputFormat,
) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let (_, breadcrumb, credentials) = load_selected(&mut service, &rt, key)?;
    let rows = credential_rows(&credentials);

    match format {
        OutputFormat::Table => print_credential_table(&breadcrumb, &rows),
        OutputFormat::Json => print_credential_json(&rows)?,
        OutputFormat::Csv => print_credential_csv(&rows),
    }

    Ok(())
}

fn print_credential_table(breadcrumb: &str, rows: &[CredentialRow]) {
    println!("{breadcrumb}");
    if rows.is_empty() {
        println!("No credentials found.");
        return;
    }

    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 40);

    println!("{:>3}  {:<name_width$}  {:<36}  PARAMETERS", "POS", "NAME", "ID");
    println!("{:-<3}  {:-<name_width$}  {:-<36}  {:-<20}", "", "", "", "");

    for row in rows {
        let params = row.parameters.keys().cloned().collect::<Vec<_>>().join(", ");
        let name = if row.is_active {
            row.name.clone()
        } else {
            format!("{} (inactive)", row.name)
        };
        println!(
            "{:>3}  {:<name_width$}  {:<36}  {}",
            row.position,
            truncate(&name, name_width),
            row.id,
            if params.is_empty() { "-" } else { &params }
        );
    }
}

fn print_credential_json(rows: &[CredentialRow]) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| CliError::Config(format!("Failed to serialize: {e}")))?;
    println!("{json}");
    Ok(())
}

fn print_credential_csv(rows: &[CredentialRow]) {
    println!("position,id,name,active");
    for row in rows {
        let name = escape_csv_field(&row.name);
        println!("{},{},{name},{}", row.position, row.id, row.is_active);
    }
}

fn cmd_credential_add(
    config_path: Option<&Path>,
    key: &str,
    name: &str,
    params: Vec<(String, String)>,
) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let forest = rt.block_on(service.refresh_groups())?.to_vec();
    let group = find_group(&forest, key)?;

    let input = params
        .into_iter()
        .fold(NewCredential::new(group.id, name), |input, (k, v)| {
            input.with_parameter(k, v)
        });
    let created = rt.block_on(service.create_credential(&input))?;

    println!(
        "Added credential '{}' to '{}' at position {} (ID {})",
        created.name,
        group.display_name(),
        created.index().map_or_else(|| "?".to_string(), |i| i.to_string()),
        created.id
    );
    Ok(())
}

/// Finds a credential by ID, exact name or case-insensitive name
fn find_credential<'a>(
    credentials: &'a [Credential],
    key: &str,
) -> Result<&'a Credential, CliError> {
    let key = key.trim();
    if let Ok(id) = key.parse::<Uuid>() {
        if let Some(credential) = credentials.iter().find(|c| c.id == id) {
            return Ok(credential);
        }
    }

    let exact: Vec<_> = credentials.iter().filter(|c| c.name == key).collect();
    let matches = if exact.is_empty() {
        credentials
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(key))
            .collect()
    } else {
        exact
    };

    match matches.as_slice() {
        [] => Err(CliError::CredentialNotFound(key.to_string())),
        [credential] => Ok(*credential),
        _ => Err(CliError::Validation(format!(
            "Ambiguous credential name '{key}'. Use its ID"
        ))),
    }
}

fn cmd_credential_update(
    config_path: Option<&Path>,
    group_key: &str,
    credential_key: &str,
    update: &CredentialUpdate,
) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let (group_id, breadcrumb, credentials) = load_selected(&mut service, &rt, group_key)?;
    let credential_id = find_credential(&credentials, credential_key)?.id;
    let updated = rt.block_on(service.update_credential(group_id, credential_id, update))?;

    let status = if updated.is_active {
        "active"
    } else {
        "inactive"
    };
    println!(
        "Updated credential '{}' in {breadcrumb} ({status})",
        updated.name
    );
    Ok(())
}

fn cmd_credential_delete(
    config_path: Option<&Path>,
    id: Uuid,
    group: Option<&str>,
) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let group_id = match group {
        Some(key) => {
            let forest = rt.block_on(service.refresh_groups())?.to_vec();
            Some(find_group(&forest, key)?.id)
        }
        None => None,
    };

    rt.block_on(service.delete_credential(id, group_id))?;
    println!("Deleted credential {id}");
    Ok(())
}

fn cmd_credential_move(
    config_path: Option<&Path>,
    key: &str,
    from: usize,
    to: usize,
) -> Result<(), CliError> {
    let mut service = create_service(config_path)?;
    let rt = runtime()?;

    let (group_id, breadcrumb, _) = load_selected(&mut service, &rt, key)?;
    let moved = rt.block_on(service.reorder_credentials(group_id, from, to))?;
    if !moved {
        println!("Credential already at position {to}; nothing to do.");
        return Ok(());
    }

    println!("New order of {breadcrumb}:");
    for (position, credential) in service
        .displayed_credentials(group_id)
        .unwrap_or_default()
        .iter()
        .enumerate()
    {
        println!("  {position:>3}  {}", credential.name);
    }
    Ok(())
}
