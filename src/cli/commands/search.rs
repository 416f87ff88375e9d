//! Search command - search indexed letters

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::error::LetterSearchError;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query (supports phrases, AND/OR/NOT and field prefixes
    /// content:, file_name:, folder_name:, letter_no:)
    pub query: String,

    /// Maximum number of results (defaults to search.max_results)
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Only show file paths (no snippets)
    #[arg(long)]
    pub files_only: bool,
}

/// Search result item
#[derive(Debug, Serialize)]
pub struct SearchResultOutput {
    pub rank: usize,
    pub letter_no: String,
    pub folder_name: String,
    pub file_name: String,
    pub full_path: String,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponseOutput {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchResultOutput>,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let results = match services.search.search(&args.query, args.limit) {
        Ok(results) => results,
        Err(LetterSearchError::IndexNotFound(_)) => {
            return Err(
                "No index found. Run 'letter-search index <ROOT>' to build one first.".into(),
            );
        }
        Err(e) => return Err(e.into()),
    };

    let output = SearchResponseOutput {
        query: args.query.clone(),
        total_results: results.len(),
        results: results
            .into_iter()
            .enumerate()
            .map(|(i, r)| SearchResultOutput {
                rank: i + 1,
                letter_no: r.letter_no,
                folder_name: r.folder_name,
                file_name: r.file_name,
                full_path: r.full_path,
                score: r.score,
                snippet: if args.files_only {
                    None
                } else {
                    Some(r.snippet)
                },
            })
            .collect(),
    };

    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!("No results found for '{}'", colors::label(&args.query));
            } else if args.files_only {
                for result in &output.results {
                    println!("{}", colors::file_path(&result.full_path));
                }
            } else {
                println!(
                    "Found {} result(s):\n",
                    colors::number(&output.total_results.to_string())
                );

                for result in &output.results {
                    println!(
                        "[{}] {} {} {}",
                        colors::rank(&result.rank.to_string()),
                        colors::number(&result.letter_no),
                        colors::file_path(&result.full_path),
                        colors::score(&format!("(score: {:.2})", result.score))
                    );
                    if let Some(snippet) = &result.snippet {
                        if !snippet.is_empty() {
                            println!("    {}", colors::dim(snippet));
                        }
                    }
                    println!();
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
