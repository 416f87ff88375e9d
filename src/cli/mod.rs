//! CLI adapter for letter-search
//!
//! Provides the command-line interface over the indexing and search
//! services. This module depends on `core/`; `core/` never depends
//! on it.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// letter-search - full-text search over letter folders
///
/// Index the PDF and DOCX documents of a letter root and search them
/// with keywords, phrases or boolean queries.
#[derive(Parser, Debug)]
#[command(name = "letter-search")]
#[command(version)]
#[command(about = "Incremental full-text search over letter folders", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index new and changed documents, remove deleted ones
    Index(commands::IndexArgs),

    /// Discard the index and index every document again
    Rebuild(commands::IndexArgs),

    /// Search indexed letters
    Search(commands::SearchArgs),

    /// Show index location and document counts
    Status(commands::StatusArgs),

    /// Delete the index and all document metadata
    Clear(commands::ClearArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  letter-search completions bash > ~/.local/share/bash-completion/completions/letter-search
    ///   zsh:   letter-search completions zsh > ~/.zfunc/_letter-search
    ///   fish:  letter-search completions fish > ~/.config/fish/completions/letter-search.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::indexer::BuildMode;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;
    xdg.log_paths();

    let config = Config::load_with_xdg(&xdg)?;
    config.log_config();

    let services = Arc::new(Services::new(config));

    match cli.command {
        Commands::Index(args) => {
            commands::index::execute(args, &services, cli.format, BuildMode::Incremental).await
        }
        Commands::Rebuild(args) => {
            commands::index::execute(args, &services, cli.format, BuildMode::Rebuild).await
        }
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::Status(args) => commands::status::execute(args, &services, cli.format).await,
        Commands::Clear(args) => commands::clear::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
