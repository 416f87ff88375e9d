//! Tantivy integration for the letter index.
//!
//! This module owns the index schema and wraps the tantivy index,
//! its single writer and its readers. One tantivy document exists
//! per [`DocumentId`]; writes replace by deleting the id term before
//! adding the new record.

use crate::core::error::{LetterSearchError, Result};
use crate::core::types::{DocumentId, IndexedDocument};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tantivy::collector::{Count, DocSetCollector, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, TermQuery};
use tantivy::schema::*;
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, TantivyError};

/// Create the Tantivy schema for letter documents
///
/// Fields:
/// - id: Document identity, exact match (STRING | STORED)
/// - letter_no: Letter number, exact match (STRING | STORED)
/// - folder_name: Letter folder name (TEXT | STORED)
/// - file_name: Document file name (TEXT | STORED)
/// - full_path: Absolute path (STORED)
/// - content: Extracted text (TEXT | STORED)
/// - last_write_ticks: Modification time in microseconds (i64 | STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("id", STRING | STORED);
    builder.add_text_field("letter_no", STRING | STORED);

    // Searchable
    builder.add_text_field("folder_name", TEXT | STORED);
    builder.add_text_field("file_name", TEXT | STORED);
    builder.add_text_field("content", TEXT | STORED);

    builder.add_text_field("full_path", STORED);
    builder.add_i64_field("last_write_ticks", INDEXED | STORED);

    builder.build()
}

/// Resolved schema fields
#[derive(Debug, Clone, Copy)]
pub struct IndexFields {
    pub id: Field,
    pub letter_no: Field,
    pub folder_name: Field,
    pub file_name: Field,
    pub full_path: Field,
    pub content: Field,
    pub last_write_ticks: Field,
}

impl IndexFields {
    /// Look up every field; a missing field means the index is not ours
    pub fn resolve(schema: &Schema) -> Result<Self> {
        let field = |name: &str| {
            schema.get_field(name).map_err(|e| {
                LetterSearchError::StorageError(format!("Missing {name} field: {e}"))
            })
        };

        Ok(Self {
            id: field("id")?,
            letter_no: field("letter_no")?,
            folder_name: field("folder_name")?,
            file_name: field("file_name")?,
            full_path: field("full_path")?,
            content: field("content")?,
            last_write_ticks: field("last_write_ticks")?,
        })
    }

    /// Fields searched when a query names no field
    pub fn default_search_fields(&self) -> Vec<Field> {
        vec![self.content, self.file_name, self.folder_name]
    }

    /// Rebuild an [`IndexedDocument`] from its stored fields
    pub fn to_indexed(&self, doc: &TantivyDocument) -> IndexedDocument {
        IndexedDocument {
            id: DocumentId::from_raw(stored_text(doc, self.id)),
            letter_no: stored_text(doc, self.letter_no),
            folder_name: stored_text(doc, self.folder_name),
            file_name: stored_text(doc, self.file_name),
            full_path: stored_text(doc, self.full_path),
            content: stored_text(doc, self.content),
            last_write_ticks: doc
                .get_first(self.last_write_ticks)
                .and_then(|v| v.as_i64())
                .unwrap_or(0),
        }
    }
}

/// Extract a stored text field, empty when absent
pub fn stored_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Tantivy index wrapper
pub struct LetterIndex {
    index: Index,
    fields: IndexFields,
    dir: PathBuf,
}

impl std::fmt::Debug for LetterIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LetterIndex")
            .field("dir", &self.dir)
            .finish()
    }
}

impl LetterIndex {
    /// True if `index_dir` holds a committed index with our schema
    pub fn exists(index_dir: &Path) -> bool {
        if !index_dir.is_dir() {
            return false;
        }
        let Ok(directory) = MmapDirectory::open(index_dir) else {
            return false;
        };
        match Index::exists(&directory) {
            Ok(true) => Index::open(directory)
                .map(|index| IndexFields::resolve(&index.schema()).is_ok())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Open an existing index
    pub fn open(index_dir: &Path) -> Result<Self> {
        if !Self::exists(index_dir) {
            return Err(LetterSearchError::IndexNotFound(
                index_dir.display().to_string(),
            ));
        }

        let index = Index::open_in_dir(index_dir).map_err(|e| {
            LetterSearchError::StorageError(format!("Failed to open index: {e}"))
        })?;
        let fields = IndexFields::resolve(&index.schema())?;

        Ok(Self {
            index,
            fields,
            dir: index_dir.to_path_buf(),
        })
    }

    /// Open the index, creating an empty one if none exists
    pub fn open_or_create(index_dir: &Path) -> Result<Self> {
        if Self::exists(index_dir) {
            return Self::open(index_dir);
        }

        if Self::holds_index_files(index_dir) {
            tracing::warn!("Replacing incompatible index at {:?}", index_dir);
            fs::remove_dir_all(index_dir)?;
        } else if !Self::is_empty_or_missing(index_dir)? {
            return Err(LetterSearchError::StorageError(format!(
                "{} is not empty and holds no index",
                index_dir.display()
            )));
        }
        fs::create_dir_all(index_dir)?;

        let schema = create_schema();
        let index = Index::create_in_dir(index_dir, schema.clone()).map_err(|e| {
            LetterSearchError::StorageError(format!("Failed to create index: {e}"))
        })?;
        let fields = IndexFields::resolve(&schema)?;

        tracing::info!("Created new index at {:?}", index_dir);

        Ok(Self {
            index,
            fields,
            dir: index_dir.to_path_buf(),
        })
    }

    /// Delete the index directory; a missing directory is a no-op
    ///
    /// Refuses to delete a non-empty directory that holds no index.
    pub fn destroy(index_dir: &Path) -> Result<()> {
        if !index_dir.exists() {
            return Ok(());
        }
        if !Self::holds_index_files(index_dir) && !Self::is_empty_or_missing(index_dir)? {
            return Err(LetterSearchError::StorageError(format!(
                "Refusing to delete {}: not an index directory",
                index_dir.display()
            )));
        }

        fs::remove_dir_all(index_dir).map_err(|e| {
            LetterSearchError::StorageError(format!("Failed to delete index: {e}"))
        })?;
        tracing::info!("Deleted index at {:?}", index_dir);
        Ok(())
    }

    fn holds_index_files(index_dir: &Path) -> bool {
        index_dir.join("meta.json").is_file()
    }

    fn is_empty_or_missing(index_dir: &Path) -> Result<bool> {
        if !index_dir.exists() {
            return Ok(true);
        }
        Ok(fs::read_dir(index_dir)?.next().is_none())
    }

    /// Acquire the single index writer
    ///
    /// Fails with [`LetterSearchError::BuildInProgress`] when another
    /// writer (in this or another process) holds the lock.
    pub fn writer(&self, heap_mb: usize) -> Result<LetterIndexWriter> {
        let writer: IndexWriter = self.index.writer(heap_mb * 1_000_000).map_err(|e| match e {
            TantivyError::LockFailure(..) => LetterSearchError::BuildInProgress,
            other => LetterSearchError::StorageError(format!("Failed to create writer: {other}")),
        })?;

        Ok(LetterIndexWriter {
            writer,
            fields: self.fields,
            finished: false,
        })
    }

    /// Get an index reader that only moves on explicit reload
    pub fn reader(&self) -> Result<IndexReader> {
        self.index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| LetterSearchError::StorageError(format!("Failed to create reader: {e}")))
    }

    /// Number of live documents in the last commit
    pub fn num_docs(&self) -> Result<u64> {
        Ok(self.reader()?.searcher().num_docs())
    }

    /// Ids of all live documents in the last commit
    ///
    /// Duplicates are kept so callers can detect them.
    pub fn document_ids(&self) -> Result<Vec<DocumentId>> {
        let searcher = self.reader()?.searcher();
        let addresses: HashSet<_> = searcher
            .search(&AllQuery, &DocSetCollector)
            .map_err(|e| LetterSearchError::StorageError(format!("Failed to list documents: {e}")))?;

        let mut ids = Vec::with_capacity(addresses.len());
        for address in addresses {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                LetterSearchError::StorageError(format!("Failed to read document: {e}"))
            })?;
            ids.push(DocumentId::from_raw(stored_text(&doc, self.fields.id)));
        }
        ids.sort();
        Ok(ids)
    }

    /// Fetch the live record for an id
    pub fn get(&self, id: &DocumentId) -> Result<Option<IndexedDocument>> {
        let searcher = self.reader()?.searcher();
        let query = TermQuery::new(
            Term::from_field_text(self.fields.id, id.as_str()),
            IndexRecordOption::Basic,
        );
        let hits = searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(|e| LetterSearchError::StorageError(format!("Lookup failed: {e}")))?;

        match hits.first() {
            Some((_, address)) => {
                let doc: TantivyDocument = searcher.doc(*address).map_err(|e| {
                    LetterSearchError::StorageError(format!("Failed to read document: {e}"))
                })?;
                Ok(Some(self.fields.to_indexed(&doc)))
            }
            None => Ok(None),
        }
    }

    /// Count live records carrying an id (0 or 1 in a healthy index)
    pub fn count_id(&self, id: &DocumentId) -> Result<usize> {
        let searcher = self.reader()?.searcher();
        let query = TermQuery::new(
            Term::from_field_text(self.fields.id, id.as_str()),
            IndexRecordOption::Basic,
        );
        searcher
            .search(&query, &Count)
            .map_err(|e| LetterSearchError::StorageError(format!("Lookup failed: {e}")))
    }

    pub fn fields(&self) -> &IndexFields {
        &self.fields
    }

    /// Get a reference to the underlying Tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Exclusive write session on the index
///
/// Changes are invisible until [`commit`](Self::commit). Dropping the
/// writer without committing rolls back every staged change.
pub struct LetterIndexWriter {
    writer: IndexWriter,
    fields: IndexFields,
    finished: bool,
}

impl LetterIndexWriter {
    /// Write or replace the record for `doc.id`
    pub fn upsert(&mut self, doc: &IndexedDocument) -> Result<()> {
        let f = &self.fields;
        self.writer
            .delete_term(Term::from_field_text(f.id, doc.id.as_str()));

        let document = doc!(
            f.id => doc.id.as_str(),
            f.letter_no => doc.letter_no.as_str(),
            f.folder_name => doc.folder_name.as_str(),
            f.file_name => doc.file_name.as_str(),
            f.full_path => doc.full_path.as_str(),
            f.content => doc.content.as_str(),
            f.last_write_ticks => doc.last_write_ticks,
        );

        self.writer
            .add_document(document)
            .map_err(|e| LetterSearchError::StorageError(format!("Failed to add document: {e}")))?;

        Ok(())
    }

    /// Remove the record for an id
    pub fn delete(&mut self, id: &DocumentId) {
        self.writer
            .delete_term(Term::from_field_text(self.fields.id, id.as_str()));
    }

    /// Remove every record
    pub fn delete_all(&mut self) -> Result<()> {
        self.writer.delete_all_documents().map_err(|e| {
            LetterSearchError::StorageError(format!("Failed to delete documents: {e}"))
        })?;
        Ok(())
    }

    /// Make all staged changes visible atomically
    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        self.writer
            .commit()
            .map_err(|e| LetterSearchError::StorageError(format!("Failed to commit: {e}")))?;
        Ok(())
    }

    /// Discard all staged changes
    pub fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.writer
            .rollback()
            .map_err(|e| LetterSearchError::StorageError(format!("Failed to roll back: {e}")))?;
        Ok(())
    }
}

impl Drop for LetterIndexWriter {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.writer.rollback() {
                tracing::error!("Failed to roll back index writer: {}", e);
            }
        }
    }
}
