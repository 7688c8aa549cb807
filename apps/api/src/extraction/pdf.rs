use std::any::Any;
use std::panic;

use tracing::warn;

use super::{concat_segments, ExtractionError};

/// Extracts text from PDF bytes, page by page, in document order.
///
/// The parser is known to panic on some malformed files; a panic is reported
/// as an unreadable document rather than unwinding into the caller.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|payload| {
            let message = panic_message(payload.as_ref());
            warn!("PDF parser panicked: {message}");
            unreadable(message)
        })?
        .map_err(|e| unreadable(e.to_string()))?;

    Ok(concat_segments(pages))
}

fn unreadable(message: String) -> ExtractionError {
    ExtractionError::Unreadable {
        format: "pdf",
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "parser panicked".to_string()
    }
}
