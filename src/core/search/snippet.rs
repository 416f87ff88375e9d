//! Result snippets.
//!
//! All windows are measured in characters, never bytes, so content
//! with multi-byte characters cannot cause a panic on a slice
//! boundary.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Marker for text cut off at either end of a snippet
pub const ELLIPSIS: &str = "…";

/// Snippet sizing, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Window length around a match, and prefix length without one
    pub length: usize,

    /// Prefix length used if snippet building fails
    pub fallback_length: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            length: 150,
            fallback_length: 100,
        }
    }
}

/// Build the snippet for a document
///
/// The first term (in order) that occurs case-insensitively in the
/// content yields a window starting half a window before the match.
/// Without a matching term the snippet is the start of the content.
pub fn extract_snippet(content: &str, terms: &[String], options: SnippetOptions) -> String {
    if content.is_empty() {
        return String::new();
    }

    match catch_unwind(AssertUnwindSafe(|| build_snippet(content, terms, options))) {
        Ok(snippet) => snippet,
        Err(_) => {
            tracing::warn!("Snippet extraction failed, using document prefix");
            format!("{}{ELLIPSIS}", prefix(content, options.fallback_length).trim())
        }
    }
}

fn build_snippet(content: &str, terms: &[String], options: SnippetOptions) -> String {
    let chars: Vec<char> = content.chars().collect();
    let folded: Vec<char> = chars.iter().map(|c| fold(*c)).collect();

    let found = terms.iter().find_map(|term| {
        let needle: Vec<char> = term.chars().map(fold).collect();
        find(&folded, &needle)
    });

    let Some(position) = found else {
        return format!("{}{ELLIPSIS}", prefix(content, options.length).trim());
    };

    let start = position.saturating_sub(options.length / 2);
    let end = (start + options.length).min(chars.len());
    let window: String = chars[start..end].iter().collect();

    let mut snippet = String::with_capacity(window.len() + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(window.trim());
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// First `len` characters of `content`
fn prefix(content: &str, len: usize) -> &str {
    match content.char_indices().nth(len) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Case folding that keeps a one-to-one char mapping
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
