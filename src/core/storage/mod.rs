//! Storage layer: the tantivy index and the metadata store.
//!
//! # Architecture
//!
//! - **LetterIndex**: Wraps the tantivy index, its schema and writer
//! - **MetadataStore**: Last-known size/mtime per document
//!
//! # Storage Layout
//!
//! ```text
//! {data_dir}/
//! ├── metadata.json       # Document metadata store
//! └── index/              # Tantivy index
//!     ├── meta.json
//!     └── [segment files]
//! ```

mod metadata;
mod tantivy;

pub use metadata::{MetadataBatch, MetadataStore, METADATA_FORMAT_VERSION};
pub use self::tantivy::{create_schema, stored_text, IndexFields, LetterIndex, LetterIndexWriter};
