// Test fixtures for integration testing

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Default folder prefix used by the fixtures
#[allow(dead_code)]
pub const FOLDER_PREFIX: &str = "SPP2-KLN-PRO-LET-";

/// Synthetic letter root on disk
///
/// Documents with a `.pdf` extension are plain text files; tests pair
/// them with a plain-text extractor. `.docx` files are real archives.
#[allow(dead_code)]
pub struct LetterTree {
    pub dir: TempDir,
    root: PathBuf,
}

#[allow(dead_code)]
impl LetterTree {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        // Builds resolve the root, so ids computed here must match
        let root = fs::canonicalize(dir.path()).expect("Failed to resolve temp dir");
        Self { dir, root }
    }

    /// Small tree: three numbered letters and one folder too short
    /// to carry a letter number
    pub fn sample() -> Self {
        let tree = Self::new();
        tree.letter(
            "0042",
            "contract.pdf",
            "The contractor shall pay a penalty for late delivery of the site survey.",
        );
        tree.letter(
            "0007",
            "notice.pdf",
            "Notice of delay. A penalty clause may apply to the tunnel works.",
        );
        tree.letter(
            "0101",
            "minutes.pdf",
            "Minutes of the progress meeting about drainage and concrete pours.",
        );
        tree.add(
            &format!("{FOLDER_PREFIX}A"),
            "scan.pdf",
            "Unnumbered correspondence mentioning the penalty once more.",
        );
        tree
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a document into a numbered letter folder
    pub fn letter(&self, number: &str, file: &str, content: &str) -> PathBuf {
        self.add(&format!("{FOLDER_PREFIX}{number}"), file, content)
    }

    /// Write a document into an arbitrary folder under the root
    pub fn add(&self, folder: &str, file: &str, content: &str) -> PathBuf {
        let dir = self.root().join(folder);
        fs::create_dir_all(&dir).expect("Failed to create folder");
        let path = dir.join(file);
        fs::write(&path, content).expect("Failed to write document");
        path
    }

    /// Write a DOCX with one `w:p` per paragraph
    pub fn add_docx(&self, folder: &str, file: &str, paragraphs: &[&str]) -> PathBuf {
        let dir = self.root().join(folder);
        fs::create_dir_all(&dir).expect("Failed to create folder");
        let path = dir.join(file);

        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let file = fs::File::create(&path).expect("Failed to create docx");
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        zip.write_all(xml.as_bytes()).expect("Failed to write zip entry");
        zip.finish().expect("Failed to finish docx");
        path
    }
}
