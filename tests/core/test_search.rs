// Integration tests for search functionality

use crate::common::{build, create_test_services, LetterTree, TestServices};
use letter_search::core::indexer::BuildMode;
use letter_search::core::search::ELLIPSIS;
use letter_search::LetterSearchError;

fn indexed_sample() -> (LetterTree, TestServices) {
    let tree = LetterTree::sample();
    let t = create_test_services();
    build(&t.services, tree.root(), BuildMode::Incremental);
    (tree, t)
}

#[test]
fn test_results_ordered_by_letter_number() {
    let (_tree, t) = indexed_sample();

    let results = t.services.search.search("penalty", None).unwrap();
    let numbers: Vec<&str> = results.iter().map(|r| r.letter_no.as_str()).collect();

    // Unnumbered letters ("0000") sort last
    assert_eq!(numbers, vec!["0007", "0042", "0000"]);
}

#[test]
fn test_result_fields_populated() {
    let (tree, t) = indexed_sample();

    let results = t.services.search.search("drainage", None).unwrap();
    assert_eq!(results.len(), 1);

    let hit = &results[0];
    assert_eq!(hit.letter_no, "0101");
    assert_eq!(hit.file_name, "minutes.pdf");
    assert_eq!(hit.folder_name, "SPP2-KLN-PRO-LET-0101");
    assert_eq!(
        hit.full_path,
        tree.root()
            .join("SPP2-KLN-PRO-LET-0101")
            .join("minutes.pdf")
            .display()
            .to_string()
    );
    assert!(hit.score > 0.0);
    assert!(hit.snippet.contains("drainage"));
}

#[test]
fn test_phrase_and_boolean_queries() {
    let (_tree, t) = indexed_sample();

    let phrase = t.services.search.search("\"site survey\"", None).unwrap();
    assert_eq!(phrase.len(), 1);
    assert_eq!(phrase[0].letter_no, "0042");

    let both = t
        .services
        .search
        .search("penalty AND tunnel", None)
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].letter_no, "0007");

    let either = t.services.search.search("tunnel drainage", None).unwrap();
    assert_eq!(either.len(), 2);
}

#[test]
fn test_field_prefixed_queries() {
    let (_tree, t) = indexed_sample();

    let by_number = t.services.search.search("letter_no:0042", None).unwrap();
    assert_eq!(by_number.len(), 1);
    assert_eq!(by_number[0].file_name, "contract.pdf");

    let by_file = t.services.search.search("file_name:notice", None).unwrap();
    assert_eq!(by_file.len(), 1);
    assert_eq!(by_file[0].letter_no, "0007");
}

#[test]
fn test_unknown_field_rejected() {
    let (_tree, t) = indexed_sample();

    let result = t.services.search.search("author:smith", None);
    assert!(matches!(result, Err(LetterSearchError::InvalidQuery(_))));
}

#[test]
fn test_empty_query_returns_nothing() {
    let (_tree, t) = indexed_sample();
    assert!(t.services.search.search("   ", None).unwrap().is_empty());
}

#[test]
fn test_limit_caps_results() {
    let (_tree, t) = indexed_sample();

    let results = t.services.search.search("penalty", Some(2)).unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn test_snippet_windows_long_content() {
    let tree = LetterTree::new();
    let filler = "lorem ipsum ".repeat(40);
    tree.letter(
        "0001",
        "long.pdf",
        &format!("{filler}the arbitration hearing is scheduled {filler}"),
    );
    let t = create_test_services();
    build(&t.services, tree.root(), BuildMode::Incremental);

    let results = t.services.search.search("arbitration", None).unwrap();
    let snippet = &results[0].snippet;
    assert!(snippet.starts_with(ELLIPSIS));
    assert!(snippet.ends_with(ELLIPSIS));
    assert!(snippet.contains("arbitration"));
    assert!(snippet.chars().count() <= 150 + 2);
}

#[test]
fn test_search_before_first_build() {
    let t = create_test_services();

    let result = t.services.search.search("penalty", None);
    assert!(matches!(result, Err(LetterSearchError::IndexNotFound(_))));
}

#[test]
fn test_search_sees_incremental_changes() {
    let (tree, t) = indexed_sample();
    assert!(t.services.search.search("asbestos", None).unwrap().is_empty());

    tree.letter("0050", "survey.pdf", "Asbestos found in the basement.");
    build(&t.services, tree.root(), BuildMode::Incremental);

    let results = t.services.search.search("asbestos", None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].letter_no, "0050");
}

#[test]
fn test_clear_then_search_reports_missing_index() {
    let (_tree, t) = indexed_sample();
    assert!(!t.services.search.search("penalty", None).unwrap().is_empty());

    t.services.clear().unwrap();

    let result = t.services.search.search("penalty", None);
    assert!(matches!(result, Err(LetterSearchError::IndexNotFound(_))));
    assert_eq!(t.services.index.metadata_count().unwrap(), 0);
}
