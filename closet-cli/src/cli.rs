//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::util::parse_key_val;

/// Closet command-line interface for managing credential groups
#[derive(Parser)]
#[command(name = "closet-cli")]
#[command(author, version, about = "Closet credential manager command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "CLOSET_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage credential groups
    #[command(subcommand, about = "Manage credential groups")]
    Group(GroupCommands),

    /// Manage credentials
    #[command(subcommand, about = "Manage credentials and their order")]
    Credential(CredentialCommands),

    /// Inspect group types
    #[command(subcommand, name = "type", about = "Inspect group types and their parameters")]
    Type(TypeCommands),

    /// Manage workspaces
    #[command(subcommand, about = "List, manage and choose workspaces")]
    Workspace(WorkspaceCommands),

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Output format for list commands
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    Table,
    /// Output as JSON
    Json,
    /// Output as CSV
    Csv,
}

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// List all groups
    #[command(about = "List credential groups with their paths")]
    List {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,

        /// Only groups whose name, or a descendant's name, contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show the group hierarchy
    #[command(about = "Print the group hierarchy as a tree")]
    Tree {
        /// Only branches whose names contain this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show group details
    #[command(about = "Show group details, type and sub-groups")]
    Show {
        /// Group name, path or ID
        group: String,
    },

    /// Create a new group
    #[command(about = "Create a root group or a sub-group")]
    Create {
        /// Group name
        name: String,

        /// Parent group name, path or ID; omit for a root group
        #[arg(short, long)]
        parent: Option<String>,

        /// Group type name or ID, required for root groups
        #[arg(short = 't', long = "type")]
        group_type: Option<String>,
    },

    /// Rename a group
    #[command(about = "Rename a group")]
    Rename {
        /// Group name, path or ID
        group: String,

        /// New name
        name: String,
    },

    /// Enable a group
    #[command(about = "Mark a group as active")]
    Enable {
        /// Group name, path or ID
        group: String,
    },

    /// Disable a group
    #[command(about = "Mark a group as inactive")]
    Disable {
        /// Group name, path or ID
        group: String,
    },

    /// Delete a group
    #[command(about = "Delete a group with all sub-groups and credentials")]
    Delete {
        /// Group name, path or ID
        group: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Credential subcommands
#[derive(Subcommand)]
pub enum CredentialCommands {
    /// List credentials in a group
    #[command(about = "List the credentials of a group in display order")]
    List {
        /// Group name, path or ID
        group: String,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Add a credential
    #[command(about = "Add a credential at the end of a group")]
    Add {
        /// Group name, path or ID
        group: String,

        /// Credential name
        name: String,

        /// Parameter value (can be repeated)
        #[arg(short, long = "param", value_parser = parse_key_val, value_name = "KEY=VALUE")]
        params: Vec<(String, String)>,
    },

    /// Edit a credential
    #[command(about = "Rename a credential or change its parameter values")]
    Update {
        /// Group name, path or ID
        group: String,

        /// Credential name or ID
        credential: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// Changed parameter value (can be repeated)
        #[arg(short, long = "param", value_parser = parse_key_val, value_name = "KEY=VALUE")]
        params: Vec<(String, String)>,
    },

    /// Enable a credential
    #[command(about = "Mark a credential as active")]
    Enable {
        /// Group name, path or ID
        group: String,

        /// Credential name or ID
        credential: String,
    },

    /// Disable a credential
    #[command(about = "Mark a credential as inactive")]
    Disable {
        /// Group name, path or ID
        group: String,

        /// Credential name or ID
        credential: String,
    },

    /// Delete a credential
    #[command(about = "Delete a credential")]
    Delete {
        /// Credential ID
        id: uuid::Uuid,

        /// Group the credential belongs to
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Move a credential within its group
    #[command(about = "Move a credential to another position in its group")]
    Move {
        /// Group name, path or ID
        group: String,

        /// Current position (zero-based)
        from: usize,

        /// New position (zero-based)
        to: usize,
    },
}

/// Group type subcommands
#[derive(Subcommand)]
pub enum TypeCommands {
    /// List group types
    #[command(about = "List group types available for root groups")]
    List {
        /// Include inactive types
        #[arg(short, long)]
        all: bool,
    },

    /// Show a type's parameters
    #[command(about = "Show the credential parameters of a group type")]
    Params {
        /// Type name or ID
        group_type: String,
    },
}

/// Workspace subcommands
#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// List workspaces
    #[command(about = "List workspaces available to the configured token")]
    List,

    /// Choose the workspace used by later commands
    #[command(about = "Save the workspace used by later commands")]
    Use {
        /// Workspace name or ID
        workspace: String,
    },

    /// Create a workspace
    #[command(about = "Create a workspace")]
    Create {
        /// Workspace name
        name: String,
    },

    /// Rename a workspace
    #[command(about = "Rename a workspace")]
    Rename {
        /// Workspace name or ID
        workspace: String,

        /// New name
        name: String,
    },

    /// Make a workspace the account default
    #[command(about = "Make a workspace the default for the account")]
    Default {
        /// Workspace name or ID
        workspace: String,
    },

    /// Delete a workspace
    #[command(about = "Delete a workspace with all its groups and credentials")]
    Delete {
        /// Workspace name or ID
        workspace: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}
