//! Tests for the search CLI command
//!
//! Tests the search command handler:
//! - Human and JSON output
//! - Files-only output and limits
//! - Error cases (no index, invalid query)

use crate::cli::test_helpers::indexed_sample;
use crate::common::create_test_services;
use letter_search::cli::commands::search::{execute, SearchArgs};
use letter_search::cli::OutputFormat;

fn args(query: &str) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        limit: None,
        files_only: false,
    }
}

#[tokio::test]
async fn test_search_human() {
    let (_tree, t) = indexed_sample();

    let result = execute(args("penalty"), &t.services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_search_json_with_limit() {
    let (_tree, t) = indexed_sample();

    let mut search = args("penalty");
    search.limit = Some(1);
    let result = execute(search, &t.services, OutputFormat::Json).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_search_files_only() {
    let (_tree, t) = indexed_sample();

    let mut search = args("\"site survey\"");
    search.files_only = true;
    let result = execute(search, &t.services, OutputFormat::Human).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_search_no_results() {
    let (_tree, t) = indexed_sample();

    let result = execute(args("nonexistentterm"), &t.services, OutputFormat::Human).await;
    assert!(result.is_ok(), "No results is not an error");
}

#[tokio::test]
async fn test_search_without_index() {
    let t = create_test_services();

    let result = execute(args("penalty"), &t.services, OutputFormat::Human).await;
    let message = result.unwrap_err().to_string();
    assert!(message.contains("No index found"), "got: {message}");
}

#[tokio::test]
async fn test_search_invalid_query() {
    let (_tree, t) = indexed_sample();

    let result = execute(args("(penalty"), &t.services, OutputFormat::Json).await;
    assert!(result.is_err());

    let result = execute(args("author:smith"), &t.services, OutputFormat::Json).await;
    assert!(result.unwrap_err().to_string().contains("Invalid query"));
}
