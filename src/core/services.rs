//! Unified service container for letter-search
//!
//! Provides shared access to the index engine and query engine, and
//! runs index builds as background tasks.

use crate::core::config::Config;
use crate::core::error::{LetterSearchError, Result};
use crate::core::indexer::{BuildMode, ExtractorRegistry, IndexEngine};
use crate::core::search::QueryEngine;
use crate::core::types::{BuildOutcome, BuildProgress};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Index builds, clear and status
    pub index: Arc<IndexEngine>,

    /// Search service for BM25 queries
    pub search: Arc<QueryEngine>,

    /// Application configuration
    pub config: Arc<Config>,

    build_active: Arc<AtomicBool>,
}

/// A build running on a blocking worker
pub struct BuildHandle {
    /// One report per folder entered
    pub progress: UnboundedReceiver<BuildProgress>,
    cancel: CancellationToken,
    task: JoinHandle<Result<BuildOutcome>>,
}

impl BuildHandle {
    /// Request cooperative cancellation
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the build to finish
    pub async fn wait(self) -> Result<BuildOutcome> {
        self.task.await.map_err(|e| {
            LetterSearchError::StorageError(format!("Build task failed: {e}"))
        })?
    }
}

/// Clears the active-build flag when the worker exits
struct ActiveBuild(Arc<AtomicBool>);

impl Drop for ActiveBuild {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Services {
    /// Create services from configuration with the default extractors
    pub fn new(config: Config) -> Self {
        Self::with_extractors(config, ExtractorRegistry::with_defaults())
    }

    /// Create services with a custom extractor registry
    pub fn with_extractors(config: Config, extractors: ExtractorRegistry) -> Self {
        let index = Arc::new(IndexEngine::new(&config, extractors));
        let search = Arc::new(QueryEngine::new(&config));

        Self {
            index,
            search,
            config: Arc::new(config),
            build_active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pick the root to index: explicit argument, else the configured default
    pub fn resolve_root(&self, root: Option<PathBuf>) -> Result<PathBuf> {
        root.or_else(|| self.config.scan.default_root.clone())
            .ok_or_else(|| {
                LetterSearchError::InvalidPath(
                    "no root folder given and scan.default_root is not set".to_string(),
                )
            })
    }

    /// Start a build on a blocking worker
    ///
    /// Fails with `BuildInProgress` while another build started here
    /// is still running. Must be called within a tokio runtime.
    pub fn spawn_build(&self, root: PathBuf, mode: BuildMode) -> Result<BuildHandle> {
        if self
            .build_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LetterSearchError::BuildInProgress);
        }
        let active = ActiveBuild(Arc::clone(&self.build_active));

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let engine = Arc::clone(&self.index);
        let token = cancel.clone();

        let task = tokio::task::spawn_blocking(move || {
            let _active = active;
            engine.build(&root, mode, &tx, &token)
        });

        Ok(BuildHandle {
            progress: rx,
            cancel,
            task,
        })
    }

    /// True while a build started by [`spawn_build`](Self::spawn_build) runs
    pub fn is_building(&self) -> bool {
        self.build_active.load(Ordering::SeqCst)
    }

    /// Delete the index and metadata and drop cached readers
    pub fn clear(&self) -> Result<()> {
        if self.is_building() {
            return Err(LetterSearchError::BuildInProgress);
        }
        self.index.clear()?;
        self.search.invalidate();
        Ok(())
    }
}
