//! Configuration management for letter-search.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! The resulting [`Config`] is passed explicitly to every component.

use crate::core::error::{LetterSearchError, Result};
use crate::core::xdg::{XdgDirs, CONFIG_FILE_ENV};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest writer heap tantivy accepts (15 MB)
const MIN_WRITER_HEAP_MB: usize = 15;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Letter folder discovery
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Folder name prefixes that mark a letter folder (case-insensitive)
    #[serde(default = "default_folder_prefixes")]
    pub folder_prefixes: Vec<String>,

    /// Number of characters after the prefix that form the letter number
    #[serde(default = "default_letter_number_length")]
    pub letter_number_length: usize,

    /// File extensions to index, without the dot (case-insensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Root folder used when a command is given none
    #[serde(default)]
    pub default_root: Option<PathBuf>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory for the tantivy index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// JSON file for per-document metadata
    #[serde(default = "default_metadata_file")]
    pub metadata_file: PathBuf,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Index writer memory budget in MB
    #[serde(default = "default_writer_heap_mb")]
    pub writer_heap_mb: usize,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum hits returned per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Snippet window in characters
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,

    /// Snippet length used when snippet construction fails
    #[serde(default = "default_fallback_snippet_length")]
    pub fallback_snippet_length: usize,

    /// Number of query terms considered when locating a snippet
    #[serde(default = "default_max_snippet_terms")]
    pub max_snippet_terms: usize,
}

// Default value functions
fn default_folder_prefixes() -> Vec<String> {
    vec![
        "SPP2-KLN-PRO-LET-".to_string(),
        "SPP2-PRO-KLN-LET-".to_string(),
    ]
}

fn default_letter_number_length() -> usize {
    4
}

fn default_extensions() -> Vec<String> {
    vec!["pdf".to_string(), "docx".to_string()]
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./data/index")
}

fn default_metadata_file() -> PathBuf {
    PathBuf::from("./data/metadata.json")
}

fn default_writer_heap_mb() -> usize {
    50
}

fn default_max_results() -> usize {
    1000
}

fn default_snippet_length() -> usize {
    150
}

fn default_fallback_snippet_length() -> usize {
    100
}

fn default_max_snippet_terms() -> usize {
    5
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            folder_prefixes: default_folder_prefixes(),
            letter_number_length: default_letter_number_length(),
            extensions: default_extensions(),
            default_root: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            metadata_file: default_metadata_file(),
        }
    }
}

impl StorageConfig {
    /// Storage rooted at a single data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            index_dir: data_dir.join("index"),
            metadata_file: data_dir.join("metadata.json"),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            writer_heap_mb: default_writer_heap_mb(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            snippet_length: default_snippet_length(),
            fallback_snippet_length: default_fallback_snippet_length(),
            max_snippet_terms: default_max_snippet_terms(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LetterSearchError::ConfigError(format!("Failed to read config file: {e}"))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. LETTER_SEARCH_CONFIG env var
    /// 2. XDG config file (~/.config/letter-search/config.toml)
    /// 3. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        // An explicitly named file must exist; the XDG one is optional
        let config_file = xdg.config_file();
        let mut config = if env::var_os(CONFIG_FILE_ENV).is_some() || config_file.exists() {
            Self::from_file(config_file)?
        } else {
            Self::default()
        };

        // Relative defaults move under the XDG data directory
        if config.storage.index_dir == default_index_dir() {
            config.storage.index_dir = xdg.index_dir();
        }
        if config.storage.metadata_file == default_metadata_file() {
            config.storage.metadata_file = xdg.metadata_file();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(data_dir) = env::var("LETTER_SEARCH_DATA_DIR") {
            self.storage = StorageConfig::in_dir(Path::new(&data_dir));
        }
        if let Ok(root) = env::var("LETTER_SEARCH_ROOT") {
            self.scan.default_root = Some(PathBuf::from(root));
        }
        if let Ok(max_results) = env::var("LETTER_SEARCH_MAX_RESULTS") {
            if let Ok(max) = max_results.parse() {
                self.search.max_results = max;
            }
        }
        if let Ok(heap) = env::var("LETTER_SEARCH_WRITER_HEAP_MB") {
            if let Ok(mb) = heap.parse() {
                self.indexing.writer_heap_mb = mb;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scan.folder_prefixes.is_empty()
            || self.scan.folder_prefixes.iter().any(|p| p.is_empty())
        {
            return Err(LetterSearchError::ConfigError(
                "At least one non-empty folder prefix is required".to_string(),
            ));
        }

        if self.scan.letter_number_length == 0 {
            return Err(LetterSearchError::ConfigError(
                "Letter number length must be non-zero".to_string(),
            ));
        }

        if self.scan.extensions.is_empty() {
            return Err(LetterSearchError::ConfigError(
                "At least one document extension is required".to_string(),
            ));
        }

        if self.indexing.writer_heap_mb < MIN_WRITER_HEAP_MB {
            return Err(LetterSearchError::ConfigError(format!(
                "Writer heap must be at least {MIN_WRITER_HEAP_MB} MB"
            )));
        }

        if self.search.max_results == 0 {
            return Err(LetterSearchError::ConfigError(
                "Max results must be non-zero".to_string(),
            ));
        }

        if self.search.snippet_length == 0 || self.search.fallback_snippet_length == 0 {
            return Err(LetterSearchError::ConfigError(
                "Snippet lengths must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::debug!("Configuration loaded:");
        tracing::debug!("  Folder prefixes: {:?}", self.scan.folder_prefixes);
        tracing::debug!("  Extensions: {:?}", self.scan.extensions);
        tracing::debug!("  Index dir: {:?}", self.storage.index_dir);
        tracing::debug!("  Metadata file: {:?}", self.storage.metadata_file);
        tracing::debug!("  Writer heap: {} MB", self.indexing.writer_heap_mb);
        tracing::debug!("  Max results: {}", self.search.max_results);
    }
}
