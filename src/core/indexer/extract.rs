//! Plain-text extraction from letter documents.
//!
//! Extraction is a capability: the index engine only sees
//! [`TextExtractor`] objects looked up by lowercase file extension in
//! an [`ExtractorRegistry`]. Default extractors cover PDF and DOCX.

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::Event;

use crate::core::error::ExtractError;

/// Maximum decompressed size of `word/document.xml` (zip-bomb guard)
const MAX_DOCUMENT_XML_BYTES: u64 = 64 * 1024 * 1024;

/// Turns a document on disk into plain text
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError>;
}

impl<F> TextExtractor for F
where
    F: Fn(&Path) -> Result<String, ExtractError> + Send + Sync,
{
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        self(path)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ExtractError> {
    fs::read(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// PDF text via `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = read_file(path)?;

        // The parser panics on some malformed files
        match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&bytes))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
            Err(_) => Err(ExtractError::Pdf("parser panicked".to_string())),
        }
    }
}

/// DOCX text from `word/document.xml`, paragraphs joined by a space
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = read_file(path)?;
        let xml = read_document_xml(&bytes)?;
        docx_paragraphs(&xml).map(|paragraphs| paragraphs.join(" "))
    }
}

fn read_document_xml(bytes: &[u8]) -> Result<Vec<u8>, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(format!("word/document.xml: {e}")))?;

    let mut xml = Vec::new();
    entry
        .take(MAX_DOCUMENT_XML_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    if xml.len() as u64 >= MAX_DOCUMENT_XML_BYTES {
        return Err(ExtractError::Docx(
            "word/document.xml exceeds size limit".to_string(),
        ));
    }
    Ok(xml)
}

/// Collect the text of each `w:p` paragraph from its `w:t` runs
fn docx_paragraphs(xml: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let text = std::mem::take(&mut current);
                    if !text.trim().is_empty() {
                        paragraphs.push(text);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(te)) if in_text => {
                let text = te
                    .unescape()
                    .map_err(|e| ExtractError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    // Text outside any closed paragraph
    if !current.trim().is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs)
}

/// Extractors keyed by lowercase extension
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut extensions: Vec<_> = self.extractors.keys().collect();
        extensions.sort();
        f.debug_struct("ExtractorRegistry")
            .field("extensions", &extensions)
            .finish()
    }
}

impl ExtractorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the PDF and DOCX extractors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("pdf", PdfExtractor);
        registry.register("docx", DocxExtractor);
        registry
    }

    /// Register (or replace) the extractor for an extension
    pub fn register(&mut self, extension: &str, extractor: impl TextExtractor + 'static) {
        self.register_arc(extension, Arc::new(extractor));
    }

    pub fn register_arc(&mut self, extension: &str, extractor: Arc<dyn TextExtractor>) {
        let key = extension.trim_start_matches('.').to_lowercase();
        self.extractors.insert(key, extractor);
    }

    pub fn get(&self, extension: &str) -> Option<&Arc<dyn TextExtractor>> {
        self.extractors.get(&extension.to_lowercase())
    }

    /// Extract text with the extractor matching the path's extension
    pub fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match self.get(extension) {
            Some(extractor) => extractor.extract_text(path),
            None => Err(ExtractError::Unsupported(extension.to_string())),
        }
    }
}
