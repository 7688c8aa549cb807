//! Text extraction — turns an uploaded document into plain text.
//!
//! Two variants sit behind [`extract`]: paginated documents (PDF, one segment
//! per page) and flow documents (DOCX, one segment per body paragraph).
//! Segments are concatenated in source order without a separator, and a
//! segment with no text contributes an empty string.

pub mod docx;
pub mod pdf;

use thiserror::Error;
use tracing::debug;

use crate::models::document::{Document, DocumentFormat};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document format '{0}'")]
    UnsupportedFormat(String),

    #[error("Could not read {format} document: {message}")]
    Unreadable {
        format: &'static str,
        message: String,
    },
}

/// Extracts the full text of `document` according to its declared format.
///
/// Fails with `UnsupportedFormat` before touching the bytes when the format
/// tag is not recognised.
pub fn extract(document: &Document) -> Result<String, ExtractionError> {
    let text = match document.format() {
        DocumentFormat::Paginated => pdf::extract_pdf_text(document.bytes())?,
        DocumentFormat::Flow => docx::extract_docx_text(document.bytes())?,
        DocumentFormat::Unrecognized(tag) => {
            return Err(ExtractionError::UnsupportedFormat(tag.clone()))
        }
    };

    debug!(
        format = %document.format(),
        bytes = document.bytes().len(),
        chars = text.chars().count(),
        "Extracted document text"
    );
    Ok(text)
}

/// Joins per-segment text in source order with no inserted separator.
pub(crate) fn concat_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .fold(String::new(), |mut acc, segment| {
            acc.push_str(segment.as_ref());
            acc
        })
}

/// In-memory document builders shared by tests across the crate.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;

    /// Builds a minimal PDF with one page per entry, each page showing its
    /// entry in Helvetica. Empty entries produce pages with an empty content
    /// stream.
    pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let page_count = pages.len();
        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", 4 + 2 * i))
            .collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_count
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        for (i, text) in pages.iter().enumerate() {
            let content_id = 5 + 2 * i;
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
            ));
            let stream = if text.is_empty() {
                String::new()
            } else {
                let escaped = text
                    .replace('\\', "\\\\")
                    .replace('(', "\\(")
                    .replace(')', "\\)");
                format!("BT /F1 12 Tf 72 720 Td ({escaped}) Tj ET")
            };
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ));
        }

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );
        out
    }

    /// Wraps a `w:body` fragment into a DOCX archive.
    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(b"<?xml version=\"1.0\"?><Types/>")
            .unwrap();
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Builds a DOCX whose body holds one single-run paragraph per entry.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| {
                if p.is_empty() {
                    "<w:p/>".to_string()
                } else {
                    let escaped = p
                        .replace('&', "&amp;")
                        .replace('<', "&lt;")
                        .replace('>', "&gt;");
                    format!("<w:p><w:r><w:t xml:space=\"preserve\">{escaped}</w:t></w:r></w:p>")
                }
            })
            .collect();
        docx_with_body(&body)
    }
}
