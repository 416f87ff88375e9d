//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the configuration as TOML, ready for a config file
    #[arg(long)]
    pub toml: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config_file: String,
    pub data_dir: String,
    #[serde(flatten)]
    pub config: &'a crate::core::config::Config,
}

/// Execute the show-config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = services.config.as_ref();

    if args.toml {
        print!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }

    let xdg = XdgDirs::new();
    let response = ConfigResponse {
        config_file: xdg.config_file().display().to_string(),
        data_dir: xdg.data_dir.display().to_string(),
        config,
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  data_dir: {}", response.data_dir);
            println!("  scan:");
            println!("    folder_prefixes: {:?}", config.scan.folder_prefixes);
            println!(
                "    letter_number_length: {}",
                config.scan.letter_number_length
            );
            println!("    extensions: {:?}", config.scan.extensions);
            match &config.scan.default_root {
                Some(root) => println!("    default_root: {}", root.display()),
                None => println!("    default_root: (not set)"),
            }
            println!("  storage:");
            println!("    index_dir: {}", config.storage.index_dir.display());
            println!("    metadata_file: {}", config.storage.metadata_file.display());
            println!("  indexing:");
            println!("    writer_heap_mb: {}", config.indexing.writer_heap_mb);
            println!("  search:");
            println!("    max_results: {}", config.search.max_results);
            println!("    snippet_length: {}", config.search.snippet_length);
            println!(
                "    fallback_snippet_length: {}",
                config.search.fallback_snippet_length
            );
            println!("    max_snippet_terms: {}", config.search.max_snippet_terms);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
