//! Status command - show index location and counts

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub index_dir: String,
    pub metadata_file: String,
    pub index_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u64>,
    pub metadata_records: usize,
    pub default_root: Option<String>,
}

/// Execute the status command
pub async fn execute(
    _args: StatusArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = &services.index;
    let index_exists = engine.index_exists();
    let document_count = if index_exists {
        Some(engine.document_count()?)
    } else {
        None
    };

    let response = StatusResponse {
        index_dir: engine.index_dir().display().to_string(),
        metadata_file: engine.metadata_file().display().to_string(),
        index_exists,
        document_count,
        metadata_records: engine.metadata_count()?,
        default_root: services
            .config
            .scan
            .default_root
            .as_ref()
            .map(|p| p.display().to_string()),
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Index status:"));
            println!("  index:     {}", colors::file_path(&response.index_dir));
            println!("  metadata:  {}", colors::file_path(&response.metadata_file));
            match response.document_count {
                Some(count) => println!(
                    "  documents: {}",
                    colors::number(&count.to_string())
                ),
                None => println!("  documents: {}", colors::warning("no index built yet")),
            }
            println!(
                "  metadata records: {}",
                colors::number(&response.metadata_records.to_string())
            );
            if let Some(root) = &response.default_root {
                println!("  default root: {}", colors::file_path(root));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
