//! Tests for the index and rebuild CLI commands
//!
//! Tests the index command handler:
//! - Indexing a new root (human and JSON output)
//! - Incremental re-run and rebuild
//! - Error cases (missing root, no root configured)

use crate::cli::test_helpers::index_args;
use crate::common::{create_test_services, LetterTree};
use letter_search::cli::commands::index::{execute, IndexArgs};
use letter_search::cli::OutputFormat;
use letter_search::core::indexer::BuildMode;

/// Test indexing a new root
#[tokio::test]
async fn test_index_new_root_human() {
    let tree = LetterTree::sample();
    let t = create_test_services();

    let result = execute(
        index_args(&tree),
        &t.services,
        OutputFormat::Human,
        BuildMode::Incremental,
    )
    .await;
    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());
    assert_eq!(t.services.index.document_count().unwrap(), 4);
    assert!(!t.services.is_building());
}

/// Test indexing a new root (JSON format)
#[tokio::test]
async fn test_index_new_root_json() {
    let tree = LetterTree::sample();
    let t = create_test_services();

    let result = execute(
        index_args(&tree),
        &t.services,
        OutputFormat::Json,
        BuildMode::Incremental,
    )
    .await;
    assert!(result.is_ok(), "Index (JSON) should succeed");
    assert_eq!(t.services.index.metadata_count().unwrap(), 4);
}

/// Test that a second incremental run re-extracts nothing
#[tokio::test]
async fn test_index_twice_is_incremental() {
    let tree = LetterTree::sample();
    let t = create_test_services();

    for _ in 0..2 {
        execute(
            index_args(&tree),
            &t.services,
            OutputFormat::Human,
            BuildMode::Incremental,
        )
        .await
        .unwrap();
    }
    assert_eq!(t.extraction_count(), 4);
}

/// Test rebuild re-extracts every document
#[tokio::test]
async fn test_rebuild_command() {
    let tree = LetterTree::sample();
    let t = create_test_services();

    execute(
        index_args(&tree),
        &t.services,
        OutputFormat::Human,
        BuildMode::Incremental,
    )
    .await
    .unwrap();
    execute(
        index_args(&tree),
        &t.services,
        OutputFormat::Json,
        BuildMode::Rebuild,
    )
    .await
    .unwrap();

    assert_eq!(t.extraction_count(), 8);
    assert_eq!(t.services.index.document_count().unwrap(), 4);
}

/// Test indexing a root that does not exist
#[tokio::test]
async fn test_index_missing_root() {
    let t = create_test_services();
    let tree = LetterTree::new();

    let args = IndexArgs {
        root: Some(tree.root().join("missing")),
        quiet: true,
    };
    let result = execute(args, &t.services, OutputFormat::Human, BuildMode::Incremental).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid path"));
    assert!(!t.services.index.index_exists());
}

/// Test that a root is required when none is configured
#[tokio::test]
async fn test_index_without_root() {
    let t = create_test_services();

    let args = IndexArgs {
        root: None,
        quiet: true,
    };
    let result = execute(args, &t.services, OutputFormat::Human, BuildMode::Incremental).await;

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("scan.default_root"));
}
