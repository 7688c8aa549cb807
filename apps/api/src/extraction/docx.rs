use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{concat_segments, ExtractionError};

/// Archive member holding the main document body.
const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts text from DOCX bytes, one segment per body paragraph.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| unreadable(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| unreadable(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| unreadable(format!("{DOCUMENT_PART}: {e}")))?;

    let paragraphs = body_paragraphs(&xml).map_err(|e| unreadable(e.to_string()))?;
    Ok(concat_segments(paragraphs))
}

fn unreadable(message: String) -> ExtractionError {
    ExtractionError::Unreadable {
        format: "docx",
        message,
    }
}

/// Walks `w:body` and returns the text of each direct child paragraph.
///
/// Only run-level `w:t`, `w:tab`, `w:br` and `w:cr` contribute, either on a
/// run of the paragraph or on a run inside one of its hyperlinks. Table
/// cells, body-level content controls and anything embedded in a run
/// (text boxes, drawings, alternate content) are skipped.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Open elements from the root down; `paragraph` indexes the open body paragraph.
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut paragraph: Option<usize> = None;
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if paragraph.is_none() && name == b"w:p" && parent_is_body(&path) {
                    paragraph = Some(path.len());
                }
                path.push(name);
            }
            Event::Empty(e) => match paragraph {
                None => {
                    if e.name().as_ref() == b"w:p" && parent_is_body(&path) {
                        paragraphs.push(String::new());
                    }
                }
                Some(p) if is_run(&path[p + 1..]) => match e.name().as_ref() {
                    b"w:tab" => current.push('\t'),
                    b"w:br" | b"w:cr" => current.push('\n'),
                    _ => {}
                },
                Some(_) => {}
            },
            Event::Text(t) => {
                if let Some(p) = paragraph {
                    if let Some((last, run)) = path[p + 1..].split_last() {
                        if last == b"w:t" && is_run(run) {
                            current.push_str(&t.unescape()?);
                        }
                    }
                }
            }
            Event::End(_) => {
                path.pop();
                if paragraph == Some(path.len()) {
                    paragraph = None;
                    paragraphs.push(std::mem::take(&mut current));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parent_is_body(path: &[Vec<u8>]) -> bool {
    path.last().is_some_and(|name| name == b"w:body")
}

/// Whether `inner`, the path below a body paragraph, ends on one of its runs.
fn is_run(inner: &[Vec<u8>]) -> bool {
    match inner {
        [run] => run == b"w:r",
        [link, run] => link == b"w:hyperlink" && run == b"w:r",
        _ => false,
    }
}
