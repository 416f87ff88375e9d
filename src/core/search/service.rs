//! BM25 search over the letter index.
//!
//! The [`QueryEngine`] parses a free-text query over the content,
//! file name and folder name fields, ranks hits with tantivy's BM25,
//! orders them by letter number and attaches a snippet to each.

use crate::core::config::Config;
use crate::core::error::{LetterSearchError, Result};
use crate::core::search::query::{preprocess_query, snippet_terms, validate_query_fields};
use crate::core::search::snippet::{extract_snippet, SnippetOptions};
use crate::core::storage::{stored_text, IndexFields, LetterIndex};
use crate::core::types::SearchResultItem;
use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tantivy::{collector::TopDocs, query::QueryParser, IndexReader, Searcher, TantivyDocument};

/// Sort key for letters without a usable number
pub const UNNUMBERED_SORT_KEY: u32 = 9999;

/// Sort key for a letter number; non-numeric and all-zero map last
pub fn letter_sort_key(letter_no: &str) -> u32 {
    match letter_no.trim().parse::<u32>() {
        Ok(0) | Err(_) => UNNUMBERED_SORT_KEY,
        Ok(n) => n,
    }
}

/// Order results by letter number, then by descending score
pub fn sort_results(results: &mut [SearchResultItem]) {
    results.sort_by(|a, b| {
        letter_sort_key(&a.letter_no)
            .cmp(&letter_sort_key(&b.letter_no))
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
    });
}

/// Open index plus the reader kept across queries
struct ReaderHandle {
    index: LetterIndex,
    reader: IndexReader,
}

/// Query execution against the committed index
pub struct QueryEngine {
    index_dir: PathBuf,
    max_results: usize,
    max_snippet_terms: usize,
    snippet: SnippetOptions,
    handle: Mutex<Option<ReaderHandle>>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("index_dir", &self.index_dir)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl QueryEngine {
    /// Create a new query engine
    pub fn new(config: &Config) -> Self {
        Self {
            index_dir: config.storage.index_dir.clone(),
            max_results: config.search.max_results,
            max_snippet_terms: config.search.max_snippet_terms,
            snippet: SnippetOptions {
                length: config.search.snippet_length,
                fallback_length: config.search.fallback_snippet_length,
            },
            handle: Mutex::new(None),
        }
    }

    /// Default result limit
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Execute a search query
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text query; boolean syntax and field prefixes allowed
    /// * `max_results` - Result limit, defaults to the configured maximum
    ///
    /// # Returns
    ///
    /// Hits ordered by letter number then score. An empty query yields
    /// no results without touching the index.
    pub fn search(&self, query: &str, max_results: Option<usize>) -> Result<Vec<SearchResultItem>> {
        let start = Instant::now();

        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let limit = max_results.unwrap_or(self.max_results);
        let result = self.execute(query, limit);

        match &result {
            Ok(results) => tracing::info!(
                "Search '{}' returned {} results in {}ms",
                query,
                results.len(),
                start.elapsed().as_millis()
            ),
            Err(LetterSearchError::IndexNotFound(_)) => {
                tracing::warn!("Search '{}' failed: no index has been built", query)
            }
            Err(e) => tracing::warn!("Search '{}' failed: {}", query, e),
        }

        result
    }

    fn execute(&self, query: &str, limit: usize) -> Result<Vec<SearchResultItem>> {
        validate_query_fields(query)?;

        let (searcher, index, fields) = self.searcher()?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let parser = QueryParser::for_index(&index, fields.default_search_fields());
        let parsed = parser
            .parse_query(&preprocess_query(query))
            .map_err(|e| LetterSearchError::InvalidQuery(format!("Failed to parse query: {e}")))?;

        let top_docs = searcher
            .search(&parsed, &TopDocs::with_limit(limit))
            .map_err(|e| LetterSearchError::SearchFailed(format!("Search failed: {e}")))?;

        let terms = snippet_terms(query, self.max_snippet_terms);
        let mut results = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                LetterSearchError::SearchFailed(format!("Failed to retrieve document: {e}"))
            })?;

            let content = stored_text(&doc, fields.content);
            results.push(SearchResultItem {
                letter_no: stored_text(&doc, fields.letter_no),
                file_name: stored_text(&doc, fields.file_name),
                full_path: stored_text(&doc, fields.full_path),
                folder_name: stored_text(&doc, fields.folder_name),
                score,
                snippet: extract_snippet(&content, &terms, self.snippet),
            });
        }

        sort_results(&mut results);
        Ok(results)
    }

    /// Searcher over the latest commit
    fn searcher(&self) -> Result<(Searcher, tantivy::Index, IndexFields)> {
        if !LetterIndex::exists(&self.index_dir) {
            self.invalidate();
            return Err(LetterSearchError::IndexNotFound(
                self.index_dir.display().to_string(),
            ));
        }

        let mut slot = self.lock_handle();
        if let Some(handle) = slot.as_ref() {
            if let Err(e) = handle.reader.reload() {
                tracing::debug!("Reader reload failed, reopening index: {}", e);
                *slot = None;
            }
        }

        if slot.is_none() {
            let index = LetterIndex::open(&self.index_dir)?;
            let reader = index.reader()?;
            *slot = Some(ReaderHandle { index, reader });
        }

        match slot.as_ref() {
            Some(handle) => Ok((
                handle.reader.searcher(),
                handle.index.index().clone(),
                *handle.index.fields(),
            )),
            None => Err(LetterSearchError::IndexNotFound(
                self.index_dir.display().to_string(),
            )),
        }
    }

    /// Drop the cached reader so the next query reopens the index
    pub fn invalidate(&self) {
        *self.lock_handle() = None;
    }

    fn lock_handle(&self) -> MutexGuard<'_, Option<ReaderHandle>> {
        // The handle is a cache; a poisoned lock is still usable
        self.handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
