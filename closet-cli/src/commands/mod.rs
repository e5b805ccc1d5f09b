//! Command handler modules for the CLI.

mod completions;
mod credential;
mod group;
mod group_type;
mod workspace;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Group(subcmd) => group::cmd_group(config_path, subcmd),
        Commands::Credential(subcmd) => credential::cmd_credential(config_path, subcmd),
        Commands::Type(subcmd) => group_type::cmd_type(config_path, subcmd),
        Commands::Workspace(subcmd) => workspace::cmd_workspace(config_path, subcmd),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
