//! File I/O operations for documents.
//!
//! Handles opening files from disk (with encoding/line-ending detection) and
//! saving documents back in the encoding and line ending they were read with.

use std::path::Path;

use anyhow::{Context, Result};

use crate::encoding::{decode_file, encode_file};

use super::{Document, DocumentOptions};

impl Document {
    /// Opens a document from a file path.
    ///
    /// The opened content is the initial save point.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn open(path: &Path, options: &DocumentOptions) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read file: {}", path.display()))?;
        let decoded = decode_file(&bytes)
            .with_context(|| format!("failed to decode file: {}", path.display()))?;

        let mut doc = Self::from_text(&decoded.text, options);
        doc.file_path = Some(path.to_path_buf());
        doc.encoding = decoded.encoding;
        doc.line_ending = decoded.line_ending;

        tracing::info!(
            "Opened {} ({}, {}, {} lines)",
            path.display(),
            doc.encoding,
            doc.line_ending,
            doc.line_count()
        );
        Ok(doc)
    }

    /// Saves the document to its file path.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no file path or the file cannot be written.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .file_path
            .as_ref()
            .context("no file path set for this document")?
            .clone();
        self.save_to(&path)
    }

    /// Saves the document to a specific path and adopts it as the file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be encoded or the file cannot be written.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        let bytes = encode_file(&self.buffer.to_string(), self.encoding, self.line_ending)
            .context("failed to encode document for saving")?;

        std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write file: {}", path.display()))?;

        self.file_path = Some(path.to_path_buf());
        self.history.mark_saved();

        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::LineEnding;

    #[test]
    fn test_open_sets_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "one\r\ntwo\r\n").unwrap();

        let doc = Document::open(&path, &DocumentOptions::default()).unwrap();
        assert_eq!(doc.file_path.as_deref(), Some(path.as_path()));
        assert_eq!(doc.line_ending, LineEnding::CrLf);
        assert_eq!(doc.full_text(), "one\ntwo\n");
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::open(&dir.path().join("absent.txt"), &DocumentOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("failed to read file"));
    }

    #[test]
    fn test_save_restores_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        std::fs::write(&path, "one\r\ntwo\r\n").unwrap();

        let mut doc = Document::open(&path, &DocumentOptions::default()).unwrap();
        doc.append_text("three\n").unwrap();
        assert!(doc.is_modified());
        doc.save().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"one\r\ntwo\r\nthree\r\n");
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_save_untitled_needs_path() {
        let mut doc = Document::new();
        assert!(doc.save().is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        doc.append_text("hello").unwrap();
        doc.save_to(&path).unwrap();
        assert_eq!(doc.file_path.as_deref(), Some(path.as_path()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_undo_past_save_point_is_modified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "abc").unwrap();

        let mut doc = Document::open(&path, &DocumentOptions::default()).unwrap();
        doc.append_text("d").unwrap();
        doc.save().unwrap();
        doc.undo().unwrap();
        assert!(doc.is_modified());
        doc.redo().unwrap();
        assert!(!doc.is_modified());
    }
}
