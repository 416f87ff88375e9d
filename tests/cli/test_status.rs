//! Tests for the status, clear and show-config CLI commands

use crate::cli::test_helpers::indexed_sample;
use crate::common::create_test_services;
use letter_search::cli::commands::{clear, config, status};
use letter_search::cli::commands::{ClearArgs, ConfigArgs, StatusArgs};
use letter_search::cli::OutputFormat;

#[tokio::test]
async fn test_status_before_first_build() {
    let t = create_test_services();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = status::execute(StatusArgs {}, &t.services, format).await;
        assert!(result.is_ok(), "Status should work without an index");
    }
}

#[tokio::test]
async fn test_status_after_build() {
    let (_tree, t) = indexed_sample();

    let result = status::execute(StatusArgs {}, &t.services, OutputFormat::Json).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_clear_with_yes() {
    let (_tree, t) = indexed_sample();
    assert!(t.services.index.index_exists());

    let result = clear::execute(ClearArgs { yes: true }, &t.services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Clear should succeed: {:?}", result.err());
    assert!(!t.services.index.index_exists());
    assert_eq!(t.services.index.metadata_count().unwrap(), 0);
}

#[tokio::test]
async fn test_clear_twice() {
    let (_tree, t) = indexed_sample();

    for _ in 0..2 {
        let result = clear::execute(ClearArgs { yes: true }, &t.services, OutputFormat::Json).await;
        assert!(result.is_ok());
    }
}

#[tokio::test]
async fn test_show_config() {
    let t = create_test_services();

    for (toml, format) in [
        (false, OutputFormat::Human),
        (false, OutputFormat::Json),
        (true, OutputFormat::Human),
    ] {
        let result = config::execute(ConfigArgs { toml }, &t.services, format).await;
        assert!(result.is_ok());
    }
}
