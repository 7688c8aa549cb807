use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::models::document::{Document, DocumentFormat};

/// An upload written to a uniquely named file in the upload directory.
///
/// The file is deleted when the value is dropped, whether classification
/// succeeded or not.
pub struct StagedUpload {
    file: NamedTempFile,
    filename: String,
    format: DocumentFormat,
}

impl StagedUpload {
    pub fn stage(upload_dir: &Path, filename: &str, bytes: &[u8]) -> Result<Self> {
        let format = DocumentFormat::from_filename(filename);
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(format.suffix())
            .tempfile_in(upload_dir)
            .with_context(|| format!("Failed to create staging file in {}", upload_dir.display()))?;
        file.write_all(bytes).context("Failed to write staged upload")?;
        file.flush().context("Failed to write staged upload")?;

        debug!(path = %file.path().display(), bytes = bytes.len(), "Staged upload '{filename}'");
        Ok(Self {
            file,
            filename: filename.to_string(),
            format,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the staged bytes back as a `Document` tagged with the upload's format.
    pub fn read_document(&self) -> Result<Document> {
        let bytes = fs::read(self.path())
            .with_context(|| format!("Failed to read staged upload {}", self.path().display()))?;
        Ok(Document::new(bytes, self.format.clone()))
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        debug!(path = %self.file.path().display(), "Deleting staged upload '{}'", self.filename);
    }
}
