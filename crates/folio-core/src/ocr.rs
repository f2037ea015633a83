//! Boundary to the OCR collaborator.
//!
//! Image preprocessing and recognition happen outside this crate. Whatever
//! performs them hands text to the pipeline through [`TextSource`]; a failed
//! recognition is not an extraction error and reads as empty text.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::OcrError;

/// Something that can produce recognized invoice text.
pub trait TextSource {
    /// Best-effort recognized text for one document.
    fn recognize(&self) -> Result<String, OcrError>;
}

impl TextSource for str {
    fn recognize(&self) -> Result<String, OcrError> {
        Ok(self.to_string())
    }
}

impl TextSource for String {
    fn recognize(&self) -> Result<String, OcrError> {
        Ok(self.clone())
    }
}

/// A transcript previously written to disk by an OCR run.
#[derive(Debug, Clone)]
pub struct TranscriptFile {
    path: PathBuf,
}

impl TranscriptFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for TranscriptFile {
    fn recognize(&self) -> Result<String, OcrError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Text from a source, or an empty string if recognition failed.
pub fn recognized_text<S: TextSource + ?Sized>(source: &S) -> String {
    match source.recognize() {
        Ok(text) => text,
        Err(e) => {
            warn!("Text recognition failed, continuing with empty text: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_source() {
        assert_eq!(recognized_text("Mini Bar 25.50"), "Mini Bar 25.50");
        assert_eq!(recognized_text(&String::from("x")), "x");
    }

    #[test]
    fn test_transcript_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.txt");
        std::fs::write(&path, "Invoice No: 9").unwrap();

        assert_eq!(recognized_text(&TranscriptFile::new(&path)), "Invoice No: 9");
    }

    #[test]
    fn test_missing_transcript_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = TranscriptFile::new(dir.path().join("missing.txt"));

        assert!(source.recognize().is_err());
        assert_eq!(recognized_text(&source), "");
    }
}
