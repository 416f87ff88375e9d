//! Clear command - delete the index and metadata

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::io::{self, Write};
use std::sync::Arc;

/// Arguments for the clear command
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Execute the clear command
pub async fn execute(
    args: ClearArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // Confirmation prompt unless --yes
    if !args.yes {
        print!(
            "Delete index at '{}' and all document metadata? [y/N] ",
            colors::file_path(&services.index.index_dir().display().to_string())
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    services.clear()?;

    match format {
        OutputFormat::Human => {
            println!("{} index and metadata", colors::success("Cleared"));
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "cleared": true,
                "index_dir": services.index.index_dir().display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
