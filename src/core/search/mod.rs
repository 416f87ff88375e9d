//! Search module for BM25 full-text search.
//!
//! This module answers free-text queries over the letter index
//! using Tantivy's BM25 ranking, orders hits by letter number and
//! builds a snippet for each hit.

mod query;
mod service;
mod snippet;

pub use query::{preprocess_query, snippet_terms, validate_query_fields, VALID_FIELDS};
pub use service::{letter_sort_key, sort_results, QueryEngine, UNNUMBERED_SORT_KEY};
pub use snippet::{extract_snippet, SnippetOptions, ELLIPSIS};
