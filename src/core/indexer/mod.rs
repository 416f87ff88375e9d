//! Document indexing module.
//!
//! Discovers letter folders, extracts document text and keeps the
//! index and metadata store in step. Key pieces:
//!
//! - Folder discovery with prefix matching and letter numbers
//! - Pluggable text extraction keyed by file extension
//! - Incremental and full builds with cooperative cancellation
//!
//! # Safety
//!
//! Letter numbers are sliced by character, never by byte, so
//! non-ASCII folder names cannot cause a panic.

pub mod engine;
pub mod extract;
pub mod scanner;

pub use engine::{BuildMode, IndexEngine, NoProgress, ProgressSink};
pub use extract::{DocxExtractor, ExtractorRegistry, PdfExtractor, TextExtractor};
pub use scanner::{FolderScanner, LetterFolder};
