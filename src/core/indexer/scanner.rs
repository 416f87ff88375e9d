//! Letter folder discovery.
//!
//! A letter root holds one directory per letter, named with a
//! recognized prefix followed by the letter number (for example
//! `SPP2-KLN-PRO-LET-0042`). Documents are the regular files
//! directly inside such a folder whose extension is allowed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::config::ScanConfig;
use crate::core::error::{LetterSearchError, Result};

/// A discovered letter folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterFolder {
    pub path: PathBuf,
    pub name: String,
    pub letter_no: String,
}

/// Enumerates letter folders and their documents under a root
#[derive(Debug, Clone)]
pub struct FolderScanner {
    prefixes: Vec<Vec<char>>,
    letter_number_length: usize,

    /// Allowed extensions, lowercase without the leading dot
    extensions: HashSet<String>,
}

impl FolderScanner {
    /// Create a new scanner
    ///
    /// # Arguments
    ///
    /// * `prefixes` - Folder name prefixes that mark a letter folder
    /// * `letter_number_length` - Characters following the prefix that
    ///   form the letter number
    /// * `extensions` - Allowed document extensions (case-insensitive,
    ///   with or without the leading dot)
    pub fn new<P, E>(prefixes: P, letter_number_length: usize, extensions: E) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().chars().collect())
                .filter(|p: &Vec<char>| !p.is_empty())
                .collect(),
            letter_number_length,
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            &config.folder_prefixes,
            config.letter_number_length,
            &config.extensions,
        )
    }

    /// The letter number used when none can be extracted
    pub fn sentinel(&self) -> String {
        "0".repeat(self.letter_number_length)
    }

    /// Enumerate letter folders directly under `root`
    ///
    /// # Returns
    ///
    /// Folders whose name starts with a recognized prefix
    /// (case-insensitive), ordered lexicographically by path. Fails
    /// with `InvalidPath` if the root is missing or not a directory.
    pub fn scan_folders(&self, root: &Path) -> Result<Vec<LetterFolder>> {
        let root = resolve_root(root)?;
        let mut folders = Vec::new();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            // Follow symlinked folders
            if !entry.path().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.has_prefix(&name) {
                continue;
            }

            folders.push(LetterFolder {
                letter_no: self.letter_number(&name),
                path: entry.path().to_path_buf(),
                name,
            });
        }

        tracing::debug!("Found {} letter folders under {:?}", folders.len(), root);
        Ok(folders)
    }

    /// Enumerate the documents of one letter folder
    ///
    /// Unreadable entries are logged and skipped; a folder with no
    /// documents yields an empty list.
    pub fn scan_documents(&self, folder: &Path) -> Vec<PathBuf> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && self.is_allowed(path) {
                        documents.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", folder, e);
                }
            }
        }

        if documents.is_empty() {
            tracing::info!("No documents found in {:?}", folder);
        }

        documents
    }

    /// True if the file extension is in the allow-list
    pub fn is_allowed(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }

    /// Extract the letter number from a folder name
    ///
    /// Finds the first case-insensitive occurrence of any recognized
    /// prefix and returns the characters that follow it. Returns the
    /// all-zero sentinel when no prefix occurs or too few characters
    /// follow. Never fails.
    pub fn letter_number(&self, folder_name: &str) -> String {
        let chars: Vec<char> = folder_name.chars().collect();

        // Earliest occurrence across all prefixes
        let start = self
            .prefixes
            .iter()
            .filter_map(|prefix| find_ignore_case(&chars, prefix).map(|at| (at, prefix.len())))
            .min_by_key(|(at, _)| *at)
            .map(|(at, len)| at + len);

        match start {
            Some(start) if chars.len() - start >= self.letter_number_length => chars
                [start..start + self.letter_number_length]
                .iter()
                .collect(),
            _ => self.sentinel(),
        }
    }

    fn has_prefix(&self, name: &str) -> bool {
        let chars: Vec<char> = name.chars().collect();
        self.prefixes
            .iter()
            .any(|prefix| prefix.len() <= chars.len() && starts_ignore_case(&chars, prefix))
    }
}

/// Normalize the root to a canonical absolute path and check it is a
/// readable directory
///
/// Document ids hash the full path, so `.`/`..` components and
/// symlinks must resolve to one spelling.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let canonical = std::fs::canonicalize(root).map_err(|e| {
        LetterSearchError::InvalidPath(format!("{}: {e}", root.display()))
    })?;

    if !canonical.is_dir() {
        return Err(LetterSearchError::InvalidPath(format!(
            "{} is not a directory",
            canonical.display()
        )));
    }

    std::fs::read_dir(&canonical).map_err(|e| {
        LetterSearchError::InvalidPath(format!("{}: {e}", canonical.display()))
    })?;

    Ok(canonical)
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn starts_ignore_case(haystack: &[char], prefix: &[char]) -> bool {
    haystack
        .iter()
        .zip(prefix)
        .all(|(a, b)| chars_eq_ignore_case(*a, *b))
}

fn find_ignore_case(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| starts_ignore_case(&haystack[i..], needle))
}
