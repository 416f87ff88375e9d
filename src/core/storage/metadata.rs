//! Durable per-document metadata store.
//!
//! Records the last-known size and modification time of every
//! indexed document so a build can tell which documents changed
//! without re-reading their content. The store is a single JSON
//! file; every mutation rewrites it through a temporary sibling and
//! an atomic rename, so a write either fully lands or leaves the
//! previous file untouched.

use crate::core::error::{LetterSearchError, Result};
use crate::core::types::{DocumentId, DocumentMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// On-disk format version
pub const METADATA_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct MetadataFile {
    version: u32,
    documents: BTreeMap<DocumentId, DocumentMetadata>,
}

/// A set of changes applied in one durable write
#[derive(Debug, Default, Clone)]
pub struct MetadataBatch {
    /// Drop every record before applying upserts and deletes
    pub clear: bool,
    pub upserts: Vec<DocumentMetadata>,
    pub deletes: Vec<DocumentId>,
}

impl MetadataBatch {
    pub fn is_empty(&self) -> bool {
        !self.clear && self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// Persistent key/value store of [`DocumentMetadata`] keyed by id
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    records: BTreeMap<DocumentId, DocumentMetadata>,
}

impl MetadataStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: &Path) -> Result<Self> {
        let records = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| {
                LetterSearchError::StorageError(format!(
                    "Failed to read metadata store {}: {e}",
                    path.display()
                ))
            })?;
            let file: MetadataFile = serde_json::from_str(&contents).map_err(|e| {
                LetterSearchError::StorageError(format!(
                    "Corrupt metadata store {}: {e}",
                    path.display()
                ))
            })?;
            if file.version > METADATA_FORMAT_VERSION {
                return Err(LetterSearchError::StorageError(format!(
                    "Metadata store {} has unsupported version {} (current: {})",
                    path.display(),
                    file.version,
                    METADATA_FORMAT_VERSION
                )));
            }
            file.documents
        } else {
            BTreeMap::new()
        };

        tracing::debug!(
            "Opened metadata store {:?} ({} records)",
            path,
            records.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, id: &DocumentId) -> Option<&DocumentMetadata> {
        self.records.get(id)
    }

    /// All records, in id order
    pub fn get_all(&self) -> Vec<DocumentMetadata> {
        self.records.values().cloned().collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or fully replace the record keyed by `metadata.id`
    pub fn upsert(&mut self, metadata: DocumentMetadata) -> Result<()> {
        self.apply(MetadataBatch {
            upserts: vec![metadata],
            ..Default::default()
        })
    }

    /// Remove a record; absent ids are a no-op
    pub fn delete(&mut self, id: &DocumentId) -> Result<()> {
        if !self.records.contains_key(id) {
            return Ok(());
        }
        self.apply(MetadataBatch {
            deletes: vec![id.clone()],
            ..Default::default()
        })
    }

    /// Remove all records
    pub fn clear(&mut self) -> Result<()> {
        self.apply(MetadataBatch {
            clear: true,
            ..Default::default()
        })
    }

    /// True if the candidate is new or its size or mtime differ
    pub fn has_changed(&self, candidate: &DocumentMetadata) -> bool {
        match self.records.get(&candidate.id) {
            None => true,
            Some(stored) => {
                stored.last_write_time_utc != candidate.last_write_time_utc
                    || stored.file_size_bytes != candidate.file_size_bytes
            }
        }
    }

    /// Apply a batch of changes as one durable write
    ///
    /// In-memory state only changes after the file has been replaced.
    pub fn apply(&mut self, batch: MetadataBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut next = if batch.clear {
            BTreeMap::new()
        } else {
            self.records.clone()
        };
        for id in &batch.deletes {
            next.remove(id);
        }
        for metadata in batch.upserts {
            next.insert(metadata.id.clone(), metadata);
        }

        self.persist(&next)?;
        self.records = next;
        Ok(())
    }

    fn persist(&self, records: &BTreeMap<DocumentId, DocumentMetadata>) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        // Borrowed view so the records are not cloned for serialization
        #[derive(Serialize)]
        struct MetadataFileRef<'a> {
            version: u32,
            documents: &'a BTreeMap<DocumentId, DocumentMetadata>,
        }

        let json = serde_json::to_vec_pretty(&MetadataFileRef {
            version: METADATA_FORMAT_VERSION,
            documents: records,
        })?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| {
            LetterSearchError::StorageError(format!(
                "Failed to replace metadata store {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}
