use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Declared format of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// Page-oriented documents (PDF).
    Paginated,
    /// Paragraph-oriented documents (DOCX).
    Flow,
    /// Anything else, carrying the tag as received.
    Unrecognized(String),
}

impl DocumentFormat {
    /// Derives the format from an uploaded file name's extension.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentFormat::Paginated
        } else if lower.ends_with(".docx") {
            DocumentFormat::Flow
        } else {
            let tag = lower
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .unwrap_or_default();
            DocumentFormat::Unrecognized(tag)
        }
    }

    /// File suffix used when staging an upload of this format.
    pub fn suffix(&self) -> &str {
        match self {
            DocumentFormat::Paginated => ".pdf",
            DocumentFormat::Flow => ".docx",
            DocumentFormat::Unrecognized(_) => ".upload",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Paginated => write!(f, "pdf"),
            DocumentFormat::Flow => write!(f, "docx"),
            DocumentFormat::Unrecognized(tag) if tag.is_empty() => write!(f, "<none>"),
            DocumentFormat::Unrecognized(tag) => write!(f, "{tag}"),
        }
    }
}

/// An uploaded document: raw bytes plus the declared format.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Bytes,
    format: DocumentFormat,
}

impl Document {
    pub fn new(bytes: impl Into<Bytes>, format: DocumentFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> &DocumentFormat {
        &self.format
    }
}
