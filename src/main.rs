mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use termcolor::ColorChoice;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(name = "autotemplate")]
#[command(about = "Fill new, empty notes from a template chosen by folder")]
#[command(version)]
struct Cli {
    /// Vault directory (overrides $AUTOTEMPLATE_VAULT)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// When to use colors (auto, always, never)
    #[arg(long, global = true, default_value = "auto", value_name = "WHEN")]
    color: ColorChoice,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Resolve vault directory from CLI arg, env var, or default
fn resolve_vault_dir(cli_arg: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = cli_arg {
        return Ok(dir);
    }

    if let Ok(env_dir) = std::env::var("AUTOTEMPLATE_VAULT") {
        return Ok(PathBuf::from(env_dir));
    }

    // Default: $XDG_DATA_HOME/autotemplate or ~/.local/share/autotemplate
    let data_home = if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data)
    } else {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        PathBuf::from(home).join(".local/share")
    };

    Ok(data_home.join("autotemplate"))
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty note and fill it from its template
    New {
        /// Vault-relative path of the note
        path: String,
    },

    /// Treat an existing note as newly created
    Apply {
        /// Vault-relative path of the note
        path: String,
    },

    /// Show which template a new note at this path would get
    Resolve {
        /// Vault-relative path of the note
        path: String,
    },

    /// Print a rendered template without writing anything
    Render {
        /// Vault-relative path of the template
        template: String,

        /// Value for {{title}}
        #[arg(long, default_value = "Untitled")]
        title: String,

        /// Render at this local time instead of now (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: Option<String>,
    },

    /// Watch the vault and fill notes as they are created
    Watch,

    /// Template settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Suggest vault paths for settings values
    #[command(subcommand)]
    Suggest(SuggestCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current settings
    Show,

    /// Set the default template (empty to clear)
    Default {
        /// Vault-relative path of the template
        template: String,
    },

    /// Folder template overrides
    #[command(subcommand)]
    Folder(FolderCommands),

    /// Paths where templates are never applied
    #[command(subcommand)]
    Ignore(IgnoreCommands),
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Add a blank override to fill in with `rename` and `set`
    Add,

    /// Use a template for notes created in a folder
    Set { folder: String, template: String },

    /// Move an override to another folder
    Rename { old: String, new: String },

    /// Remove an override
    Remove { folder: String },
}

#[derive(Subcommand)]
enum IgnoreCommands {
    /// Ignore a path
    Add { path: String },

    /// Replace an ignored path (empty to remove)
    Update { old: String, new: String },

    /// Stop ignoring a path
    Remove { path: String },
}

#[derive(Subcommand)]
enum SuggestCommands {
    /// Markdown files matching a query
    Files {
        #[arg(default_value = "")]
        query: String,
    },

    /// Folders matching a query
    Folders {
        #[arg(default_value = "")]
        query: String,

        /// Leave out folders that already have an override, except FOLDER
        #[arg(long, value_name = "FOLDER", num_args = 0..=1, default_missing_value = "")]
        for_override: Option<String>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let cli_args = Cli::parse();
    cli::logging::init(cli_args.verbose);
    let vault = resolve_vault_dir(cli_args.vault)?;
    let color = cli_args.color;

    match cli_args.command {
        Commands::New { path } => {
            cli::commands::new(&vault, &path, color)?;
        }
        Commands::Apply { path } => {
            cli::commands::apply(&vault, &path, color)?;
        }
        Commands::Resolve { path } => {
            cli::commands::resolve(&vault, &path, color)?;
        }
        Commands::Render { template, title, at } => {
            cli::commands::render(&vault, &template, &title, at.as_deref())?;
        }
        Commands::Watch => {
            cli::watch::run(&vault, color)?;
        }
        Commands::Config(config_cmd) => {
            let edit = match config_cmd {
                ConfigCommands::Show => {
                    return cli::commands::config_show(&vault);
                }
                ConfigCommands::Default { template } => cli::SettingsEdit::Default(template),
                ConfigCommands::Folder(cmd) => match cmd {
                    FolderCommands::Add => cli::SettingsEdit::AddFolderPlaceholder,
                    FolderCommands::Set { folder, template } => {
                        cli::SettingsEdit::SetFolder(folder, template)
                    }
                    FolderCommands::Rename { old, new } => cli::SettingsEdit::RenameFolder(old, new),
                    FolderCommands::Remove { folder } => cli::SettingsEdit::RemoveFolder(folder),
                },
                ConfigCommands::Ignore(cmd) => match cmd {
                    IgnoreCommands::Add { path } => cli::SettingsEdit::AddIgnore(path),
                    IgnoreCommands::Update { old, new } => cli::SettingsEdit::UpdateIgnore(old, new),
                    IgnoreCommands::Remove { path } => cli::SettingsEdit::RemoveIgnore(path),
                },
            };
            cli::commands::config_edit(&vault, edit, color)?;
        }
        Commands::Suggest(cmd) => match cmd {
            SuggestCommands::Files { query } => {
                cli::commands::suggest(&vault, cli::SuggestKind::Files, &query)?;
            }
            SuggestCommands::Folders {
                query,
                for_override,
            } => {
                let kind = match for_override {
                    Some(editing) => cli::SuggestKind::OverrideFolders(editing),
                    None => cli::SuggestKind::Folders,
                };
                cli::commands::suggest(&vault, kind, &query)?;
            }
        },
    }

    Ok(())
}
