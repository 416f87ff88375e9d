//! letter-search - Incremental full-text search over letter folders
//!
//! Indexes the PDF and DOCX documents stored in per-letter folders
//! with BM25 full-text search via Tantivy, and answers ranked
//! queries with snippets.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (adapter-agnostic)
//!   - config, error, types, xdg
//!   - storage (Tantivy index, metadata store)
//!   - indexer (folder scanning, text extraction, builds)
//!   - search (queries, ranking, snippets)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - Incremental builds that only re-extract changed documents
//! - Atomic commits: cancelled or failed builds leave the index intact
//! - Character-based letter numbers and snippets (UTF-8 safe)
//! - BM25 search via Tantivy, ordered by letter number

// Core domain logic (adapter-agnostic)
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{LetterSearchError, Result};
pub use core::services::Services;
pub use core::types::*;
