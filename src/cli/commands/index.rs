//! Index and rebuild commands - build the letter index

use crate::cli::output::{colors, format_duration, print_warning};
use crate::cli::OutputFormat;
use crate::core::indexer::BuildMode;
use crate::core::services::Services;
use crate::core::types::{BuildOutcome, BuildStats};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the index and rebuild commands
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Letter root folder (defaults to scan.default_root)
    pub root: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Build result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub root: String,
    pub mode: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<BuildStats>,
}

fn mode_name(mode: BuildMode) -> &'static str {
    match mode {
        BuildMode::Incremental => "incremental",
        BuildMode::Rebuild => "rebuild",
    }
}

/// Execute the index or rebuild command
///
/// Ctrl-C cancels the build cooperatively; the previous index stays
/// in place.
pub async fn execute(
    args: IndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
    mode: BuildMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = services.resolve_root(args.root)?;
    let show_progress = !args.quiet && format == OutputFormat::Human;

    if show_progress {
        eprintln!(
            "{} {}...",
            if mode == BuildMode::Rebuild {
                "Rebuilding index for"
            } else {
                "Indexing"
            },
            colors::file_path(&root.display().to_string())
        );
    }

    let mut handle = services.spawn_build(root.clone(), mode)?;

    let token = handle.cancellation_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    // Ends when the build drops its sender
    let mut folder_index = 0;
    while let Some(progress) = handle.progress.recv().await {
        folder_index += 1;
        if show_progress {
            eprintln!(
                "  [{}/{}] {} {}",
                colors::number(&folder_index.to_string()),
                colors::number(&progress.total_folders.to_string()),
                colors::file_path(&progress.current_folder),
                colors::dim(&format!("({} indexed)", progress.documents_indexed))
            );
        }
    }

    let outcome = handle.wait().await;
    ctrl_c.abort();
    let outcome = outcome?;

    let response = IndexResponse {
        root: root.display().to_string(),
        mode: mode_name(mode),
        status: if outcome.is_cancelled() {
            "cancelled"
        } else {
            "completed"
        },
        stats: match &outcome {
            BuildOutcome::Completed(stats) => Some(stats.clone()),
            BuildOutcome::Cancelled => None,
        },
    };

    match format {
        OutputFormat::Human => match &outcome {
            BuildOutcome::Completed(stats) => {
                println!(
                    "{} {} of {} documents in {} folders in {}",
                    colors::success("Indexed"),
                    colors::number(&stats.documents_indexed.to_string()),
                    colors::number(&stats.documents_seen.to_string()),
                    colors::number(&stats.folders_scanned.to_string()),
                    colors::number(&format_duration(stats.duration_ms as f64 / 1000.0))
                );
                if stats.documents_removed > 0 {
                    println!(
                        "Removed {} deleted document(s)",
                        colors::number(&stats.documents_removed.to_string())
                    );
                }
                if stats.documents_skipped > 0 {
                    print_warning(&format!(
                        "{} document(s) produced no text and were skipped",
                        stats.documents_skipped
                    ));
                }
            }
            BuildOutcome::Cancelled => {
                println!(
                    "{}",
                    colors::warning("Indexing cancelled, previous index unchanged")
                );
            }
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
