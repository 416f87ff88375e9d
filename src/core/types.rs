//! Core data types for letter-search.
//!
//! This module defines the document identity, the metadata record
//! used for change detection, the persisted index record, search
//! results and build progress/outcome types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Stable identity of a document, derived from its path
///
/// SHA-256 over the lowercased absolute path, rendered as uppercase
/// hex. Two spellings of the same path that differ only in case map
/// to the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Derive the id for a document path
    pub fn from_path(path: &Path) -> Self {
        let folded = path.to_string_lossy().to_lowercase();
        let digest = Sha256::digest(folded.as_bytes());
        Self(hex::encode_upper(digest))
    }

    /// Wrap an id read back from storage
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last-known attributes of a document, used to detect changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: DocumentId,

    /// 4-character letter number or the "0000" sentinel
    pub letter_no: String,

    pub folder_name: String,
    pub file_name: String,
    pub full_path: PathBuf,
    pub file_size_bytes: u64,
    pub last_write_time_utc: DateTime<Utc>,
}

impl DocumentMetadata {
    /// Read size and modification time of a document from disk
    pub fn read(path: &Path, folder_name: &str, letter_no: &str) -> std::io::Result<Self> {
        let meta = fs::metadata(path)?;
        let modified: DateTime<Utc> = meta.modified()?.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            id: DocumentId::from_path(path),
            letter_no: letter_no.to_string(),
            folder_name: folder_name.to_string(),
            file_name,
            full_path: path.to_path_buf(),
            file_size_bytes: meta.len(),
            last_write_time_utc: modified,
        })
    }

    /// Modification time as a tick count (microseconds since the Unix epoch)
    pub fn last_write_ticks(&self) -> i64 {
        self.last_write_time_utc.timestamp_micros()
    }

    /// Build the index record for this document
    pub fn to_indexed(&self, content: String) -> IndexedDocument {
        IndexedDocument {
            id: self.id.clone(),
            letter_no: self.letter_no.clone(),
            folder_name: self.folder_name.clone(),
            file_name: self.file_name.clone(),
            full_path: self.full_path.to_string_lossy().into_owned(),
            content,
            last_write_ticks: self.last_write_ticks(),
        }
    }
}

/// A document as persisted in the index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    pub id: DocumentId,
    pub letter_no: String,
    pub folder_name: String,
    pub file_name: String,
    pub full_path: String,

    /// Full extracted text
    pub content: String,

    pub last_write_ticks: i64,
}

/// A ranked search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub letter_no: String,
    pub file_name: String,
    pub full_path: String,
    pub folder_name: String,

    /// BM25 relevance score (higher = more relevant)
    pub score: f32,

    pub snippet: String,
}

/// Progress report emitted each time a build enters a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildProgress {
    pub total_folders: usize,
    pub documents_indexed: usize,
    pub current_folder: String,
}

/// Statistics from a completed build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    /// Letter folders discovered under the root
    pub folders_scanned: usize,

    /// Documents discovered in those folders
    pub documents_seen: usize,

    /// Documents (re)indexed in this pass
    pub documents_indexed: usize,

    /// New or changed documents whose extraction produced no text
    pub documents_skipped: usize,

    /// Documents removed because their file disappeared
    pub documents_removed: usize,

    pub duration_ms: u64,
}

/// Terminal state of a build that did not fail
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Completed(BuildStats),
    Cancelled,
}

impl BuildOutcome {
    /// Documents (re)indexed; zero for a cancelled build
    pub fn documents_indexed(&self) -> usize {
        match self {
            BuildOutcome::Completed(stats) => stats.documents_indexed,
            BuildOutcome::Cancelled => 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BuildOutcome::Cancelled)
    }
}
