//! Core domain logic (adapter-agnostic)
//!
//! This module contains all indexing and search logic, independent
//! of the command-line adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **storage**: Tantivy index and metadata store
//! - **search**: Query parsing, ranking and snippets
//! - **indexer**: Folder scanning, extraction and builds
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod indexer;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{LetterSearchError, Result};
pub use services::Services;
