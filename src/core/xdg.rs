//! XDG Base Directory Support
//!
//! Resolves where letter-search keeps its configuration file, the
//! tantivy index and the document metadata store.

use std::env;
use std::fs;
use std::path::PathBuf;

/// Env var naming a config file that replaces the XDG one
pub const CONFIG_FILE_ENV: &str = "LETTER_SEARCH_CONFIG";

/// XDG directory structure for letter-search
///
/// Implements XDG Base Directory specification with fallbacks and
/// explicit `LETTER_SEARCH_*` overrides.
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Create new XDG directory structure with proper resolution order
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit LETTER_SEARCH_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share)
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
            data_dir: Self::resolve_data_dir(),
        }
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(dir) = env::var("LETTER_SEARCH_CONFIG_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("letter-search");
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("letter-search")
    }

    fn resolve_data_dir() -> PathBuf {
        if let Ok(dir) = env::var("LETTER_SEARCH_DATA_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("letter-search");
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".local")
            .join("share")
            .join("letter-search")
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        if let Ok(file) = env::var(CONFIG_FILE_ENV) {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Directory holding the tantivy index
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// JSON file holding per-document metadata
    pub fn metadata_file(&self) -> PathBuf {
        self.data_dir.join("metadata.json")
    }

    /// Create all XDG directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data: {:?}", self.data_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
