//! Incremental index builds.
//!
//! A build pass walks the letter root, diffs every document against
//! the metadata store, extracts text for new or changed documents and
//! writes them to the index. Documents that disappeared are swept out.
//! Nothing becomes visible until the single commit at the end of the
//! pass; the metadata store is written right after that commit.
//!
//! # Transactions
//!
//! All index changes of a pass go through one [`LetterIndexWriter`].
//! Returning early (error or cancellation) drops the writer, which
//! rolls back every staged change, and skips the metadata write. The
//! previously committed index and metadata stay untouched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::core::config::Config;
use crate::core::error::{LetterSearchError, Result};
use crate::core::indexer::{ExtractorRegistry, FolderScanner};
use crate::core::storage::{LetterIndex, LetterIndexWriter, MetadataBatch, MetadataStore};
use crate::core::types::{BuildOutcome, BuildProgress, BuildStats, DocumentId, DocumentMetadata};

/// Receives a progress report each time a build enters a folder
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: BuildProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(BuildProgress) + Send + Sync,
{
    fn report(&self, progress: BuildProgress) {
        self(progress)
    }
}

impl ProgressSink for UnboundedSender<BuildProgress> {
    fn report(&self, progress: BuildProgress) {
        // A dropped receiver just means nobody is watching
        let _ = self.send(progress);
    }
}

/// Discards progress reports
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: BuildProgress) {}
}

/// Kind of build pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Re-process only new and changed documents
    Incremental,

    /// Discard everything and index from an empty baseline
    Rebuild,
}

/// Orchestrates builds against one index and metadata store
pub struct IndexEngine {
    index_dir: PathBuf,
    metadata_file: PathBuf,
    writer_heap_mb: usize,
    scanner: FolderScanner,
    extractors: ExtractorRegistry,

    /// Held for the duration of a build or clear
    build_lock: Mutex<()>,
}

impl std::fmt::Debug for IndexEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexEngine")
            .field("index_dir", &self.index_dir)
            .field("metadata_file", &self.metadata_file)
            .field("extractors", &self.extractors)
            .finish()
    }
}

impl IndexEngine {
    /// Create an engine from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Storage, scan and indexing settings
    /// * `extractors` - Text extractors keyed by file extension
    pub fn new(config: &Config, extractors: ExtractorRegistry) -> Self {
        Self {
            index_dir: config.storage.index_dir.clone(),
            metadata_file: config.storage.metadata_file.clone(),
            writer_heap_mb: config.indexing.writer_heap_mb,
            scanner: FolderScanner::from_config(&config.scan),
            extractors,
            build_lock: Mutex::new(()),
        }
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    pub fn metadata_file(&self) -> &Path {
        &self.metadata_file
    }

    pub fn scanner(&self) -> &FolderScanner {
        &self.scanner
    }

    /// Re-index new and changed documents, remove deleted ones
    pub fn build_incremental(
        &self,
        root: &Path,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<BuildOutcome> {
        self.build(root, BuildMode::Incremental, progress, cancel)
    }

    /// Discard the index and metadata and index everything again
    ///
    /// The discard is committed together with the new content, so a
    /// cancelled or failed rebuild keeps the previous state.
    pub fn rebuild(
        &self,
        root: &Path,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<BuildOutcome> {
        self.build(root, BuildMode::Rebuild, progress, cancel)
    }

    /// Run one build pass
    ///
    /// Fails with `BuildInProgress` if another build holds the engine.
    pub fn build(
        &self,
        root: &Path,
        mode: BuildMode,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<BuildOutcome> {
        let _guard = self.lock_build()?;

        let result = self.run_pass(root, mode, progress, cancel);
        match &result {
            Ok(BuildOutcome::Cancelled) => {
                tracing::info!("Build cancelled, previous index left unchanged");
            }
            Err(e) if e.is_fatal() => tracing::error!("Build failed: {}", e),
            Err(e) => tracing::warn!("Build failed: {}", e),
            Ok(BuildOutcome::Completed(_)) => {}
        }
        result
    }

    fn run_pass(
        &self,
        root: &Path,
        mode: BuildMode,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<BuildOutcome> {
        let start = Instant::now();
        let rebuild = mode == BuildMode::Rebuild;

        // Scanning
        tracing::info!("Starting {:?} build of {:?}", mode, root);
        let folders = self.scanner.scan_folders(root)?;
        let total_folders = folders.len();

        let mut metadata = MetadataStore::open(&self.metadata_file)?;
        let index = LetterIndex::open_or_create(&self.index_dir)?;
        // A lost or replaced index leaves metadata ahead of it
        let indexed: HashSet<DocumentId> = index.document_ids()?.into_iter().collect();
        let mut writer = index.writer(self.writer_heap_mb)?;

        let mut batch = MetadataBatch::default();
        if rebuild {
            writer.delete_all()?;
            batch.clear = true;
        }

        let mut stats = BuildStats {
            folders_scanned: total_folders,
            ..Default::default()
        };
        let mut live_ids: HashSet<DocumentId> = HashSet::new();

        for folder in &folders {
            if cancel.is_cancelled() {
                return Ok(BuildOutcome::Cancelled);
            }

            progress.report(BuildProgress {
                total_folders,
                documents_indexed: stats.documents_indexed,
                current_folder: folder.name.clone(),
            });

            for path in self.scanner.scan_documents(&folder.path) {
                if cancel.is_cancelled() {
                    return Ok(BuildOutcome::Cancelled);
                }

                // Diffing
                let id = DocumentId::from_path(&path);
                live_ids.insert(id.clone());

                let candidate = match DocumentMetadata::read(&path, &folder.name, &folder.letter_no) {
                    Ok(candidate) => candidate,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable document {:?}: {}", path, e);
                        if !rebuild {
                            keep_previous(&id, &metadata, &indexed, &mut writer, &mut batch);
                        }
                        continue;
                    }
                };
                stats.documents_seen += 1;

                if !rebuild && !metadata.has_changed(&candidate) && indexed.contains(&id) {
                    continue;
                }

                // Extracting
                let content = match self.extractors.extract(&path) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("Text extraction failed for {:?}: {}", path, e);
                        String::new()
                    }
                };

                if content.trim().is_empty() {
                    tracing::warn!("No text extracted from {:?}, not indexed", path);
                    stats.documents_skipped += 1;
                    if !rebuild {
                        keep_previous(&id, &metadata, &indexed, &mut writer, &mut batch);
                    }
                    continue;
                }

                // Indexing
                writer.upsert(&candidate.to_indexed(content))?;
                tracing::debug!("Indexed {:?}", path);
                batch.upserts.push(candidate);
                stats.documents_indexed += 1;
            }
        }

        // Deletion sweep over both stores
        if !rebuild {
            let mut stale: HashSet<DocumentId> = metadata
                .ids()
                .filter(|id| !live_ids.contains(*id))
                .cloned()
                .collect();
            stale.extend(indexed.iter().filter(|id| !live_ids.contains(*id)).cloned());

            for id in stale {
                writer.delete(&id);
                if metadata.get(&id).is_some() {
                    batch.deletes.push(id);
                }
                stats.documents_removed += 1;
            }
        }

        if cancel.is_cancelled() {
            return Ok(BuildOutcome::Cancelled);
        }

        // Committing
        writer.commit()?;
        metadata.apply(batch)?;

        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Build complete: {} folders, {} documents seen, {} indexed, \
             {} skipped, {} removed in {}ms",
            stats.folders_scanned,
            stats.documents_seen,
            stats.documents_indexed,
            stats.documents_skipped,
            stats.documents_removed,
            stats.duration_ms
        );

        Ok(BuildOutcome::Completed(stats))
    }

    /// True if a committed index with the expected schema exists
    pub fn index_exists(&self) -> bool {
        LetterIndex::exists(&self.index_dir)
    }

    /// Delete the index and all metadata; idempotent
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock_build()?;

        LetterIndex::destroy(&self.index_dir)?;
        if self.metadata_file.exists() {
            std::fs::remove_file(&self.metadata_file).map_err(|e| {
                LetterSearchError::StorageError(format!("Failed to delete metadata: {e}"))
            })?;
        }

        tracing::info!("Index and metadata cleared");
        Ok(())
    }

    /// Live documents in the committed index
    pub fn document_count(&self) -> Result<u64> {
        LetterIndex::open(&self.index_dir)?.num_docs()
    }

    /// Records in the metadata store
    pub fn metadata_count(&self) -> Result<usize> {
        Ok(MetadataStore::open(&self.metadata_file)?.len())
    }

    /// True while a build or clear is running
    pub fn is_busy(&self) -> bool {
        matches!(self.build_lock.try_lock(), Err(TryLockError::WouldBlock))
    }

    fn lock_build(&self) -> Result<MutexGuard<'_, ()>> {
        match self.build_lock.try_lock() {
            Ok(guard) => Ok(guard),
            // A panicked build leaves nothing half-applied
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => Err(LetterSearchError::BuildInProgress),
        }
    }
}

/// Leave a document's committed state alone for a skipped item
///
/// A record survives only if both stores hold it. A half-present one
/// is dropped from the store that has it, so the document is retried
/// on the next pass.
fn keep_previous(
    id: &DocumentId,
    metadata: &MetadataStore,
    indexed: &HashSet<DocumentId>,
    writer: &mut LetterIndexWriter,
    batch: &mut MetadataBatch,
) {
    match (metadata.get(id).is_some(), indexed.contains(id)) {
        (true, false) => batch.deletes.push(id.clone()),
        (false, true) => writer.delete(id),
        _ => {}
    }
}
