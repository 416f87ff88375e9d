// Test helper functions

use letter_search::core::config::{Config, StorageConfig};
use letter_search::core::error::ExtractError;
use letter_search::core::indexer::{
    BuildMode, DocxExtractor, ExtractorRegistry, NoProgress, TextExtractor,
};
use letter_search::core::services::Services;
use letter_search::core::types::{BuildOutcome, BuildStats};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Services over temporary storage, plus a count of extractor calls
#[allow(dead_code)]
pub struct TestServices {
    pub services: Arc<Services>,
    pub extractions: Arc<AtomicUsize>,
    pub storage: TempDir,
}

#[allow(dead_code)]
impl TestServices {
    pub fn extraction_count(&self) -> usize {
        self.extractions.load(Ordering::SeqCst)
    }
}

/// Registry reading `.pdf` as plain text and `.docx` for real
///
/// Every call is counted in `counter`.
#[allow(dead_code)]
pub fn text_extractors(counter: Arc<AtomicUsize>) -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new();

    let pdf_counter = Arc::clone(&counter);
    registry.register("pdf", move |path: &Path| {
        pdf_counter.fetch_add(1, Ordering::SeqCst);
        fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })
    });

    registry.register("docx", move |path: &Path| {
        counter.fetch_add(1, Ordering::SeqCst);
        DocxExtractor.extract_text(path)
    });

    registry
}

/// Create test services with temporary storage
#[allow(dead_code)]
pub fn create_test_services() -> TestServices {
    let storage = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.storage = StorageConfig::in_dir(&storage.path().join("data"));

    let extractions = Arc::new(AtomicUsize::new(0));
    let services = Services::with_extractors(config, text_extractors(Arc::clone(&extractions)));

    TestServices {
        services: Arc::new(services),
        extractions,
        storage,
    }
}

/// Services over the same storage as `t`, with other extractors
#[allow(dead_code)]
pub fn services_sharing(t: &TestServices, extractors: ExtractorRegistry) -> Services {
    Services::with_extractors((*t.services.config).clone(), extractors)
}

/// Run a build synchronously on the index engine
#[allow(dead_code)]
pub fn build(services: &Services, root: &Path, mode: BuildMode) -> BuildOutcome {
    services
        .index
        .build(root, mode, &NoProgress, &CancellationToken::new())
        .expect("Build failed")
}

/// Unwrap the stats of a completed build
#[allow(dead_code)]
pub fn completed(outcome: BuildOutcome) -> BuildStats {
    match outcome {
        BuildOutcome::Completed(stats) => stats,
        BuildOutcome::Cancelled => panic!("Expected a completed build"),
    }
}
