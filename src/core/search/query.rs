//! Query preprocessing for letter searches.
//!
//! This module prepares user queries for the tantivy query parser:
//! - Curly braces are escaped: `{draft}` -> `\{draft\}`
//! - Windows-style paths are quoted: `C:\letters\a.pdf` -> `"C:\\letters\\a.pdf"`
//!
//! It also validates field prefixes to give helpful error messages,
//! and derives the terms used to pick a result snippet.

use crate::core::error::{LetterSearchError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fields a query may name explicitly
pub const VALID_FIELDS: [&str; 4] = ["content", "file_name", "folder_name", "letter_no"];

static WINDOWS_PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]:\\").unwrap());

// Pattern to detect potential field prefixes (word:nonspace)
static FIELD_PREFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+):([^\s:])").unwrap());

/// Preprocess a query string for the tantivy query parser.
///
/// # Examples
///
/// ```
/// use letter_search::core::search::preprocess_query;
///
/// assert_eq!(preprocess_query("  invoice {draft} "), "invoice \\{draft\\}");
/// assert_eq!(preprocess_query("C:\\letters"), "\"C:\\\\letters\"");
/// ```
pub fn preprocess_query(query: &str) -> String {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return String::new();
    }

    // A drive letter would otherwise read as a field prefix
    if WINDOWS_PATH_PATTERN.is_match(trimmed) && !trimmed.contains('"') {
        let escaped = escape_braces(&trimmed.replace('\\', "\\\\"));
        return format!("\"{escaped}\"");
    }

    escape_braces(trimmed)
}

fn escape_braces(s: &str) -> String {
    s.replace('{', "\\{").replace('}', "\\}")
}

/// Validate that all field prefixes in a query name known fields.
///
/// # Examples
///
/// ```
/// use letter_search::core::search::validate_query_fields;
///
/// assert!(validate_query_fields("folder_name:0042 invoice").is_ok());
/// assert!(validate_query_fields("folder:0042").is_err());
/// ```
pub fn validate_query_fields(query: &str) -> Result<()> {
    let trimmed = query.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') {
        return Ok(());
    }
    if WINDOWS_PATH_PATTERN.is_match(trimmed) {
        return Ok(());
    }

    for cap in FIELD_PREFIX_PATTERN.captures_iter(query) {
        let Some(whole) = cap.get(0) else { continue };
        let field = &cap[1];

        // Only a prefix at the start of a clause counts
        let preceded_by = query[..whole.start()].chars().next_back();
        if matches!(preceded_by, Some(c) if !c.is_whitespace() && c != '(' && c != '+' && c != '-')
        {
            continue;
        }

        if VALID_FIELDS.contains(&field) {
            continue;
        }

        let hint = match suggest_field_alias(field) {
            Some(alias) => format!(" (did you mean '{alias}:'?)"),
            None => String::new(),
        };
        return Err(LetterSearchError::InvalidQuery(format!(
            "Unknown field '{field}'{hint}. Valid fields: {}",
            VALID_FIELDS.join(", ")
        )));
    }

    Ok(())
}

/// Suggest a valid field name for common aliases.
fn suggest_field_alias(field: &str) -> Option<&'static str> {
    match field.to_lowercase().as_str() {
        "file" | "filename" | "name" | "document" => Some("file_name"),
        "folder" | "foldername" | "dir" | "directory" => Some("folder_name"),
        "letter" | "number" | "no" | "letterno" | "letter_number" => Some("letter_no"),
        "text" | "body" | "contents" => Some("content"),
        _ => None,
    }
}

/// Terms used to locate a snippet for a query
///
/// Quotes are removed and the boolean operators `AND`/`OR` are dropped.
/// Of the remaining whitespace-separated tokens, those shorter than
/// three characters or starting with `-` are skipped. At most
/// `max_terms` terms are returned, in query order.
pub fn snippet_terms(query: &str, max_terms: usize) -> Vec<String> {
    query
        .replace('"', "")
        .split_whitespace()
        .filter(|token| *token != "AND" && *token != "OR")
        .filter(|token| token.chars().count() >= 3 && !token.starts_with('-'))
        .take(max_terms)
        .map(str::to_string)
        .collect()
}
