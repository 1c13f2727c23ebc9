//! Resume text extraction from uploaded PDF bytes.
//!
//! Pages are read in order with `lopdf`; pages with no extractable text (scans,
//! images) are skipped rather than leaving blank lines. When no page yields any
//! text the whole buffer gets a second pass through `pdf-extract`, which copes
//! with some font encodings `lopdf` does not decode.

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("the uploaded file is not a PDF document")]
    UnsupportedFormat,

    #[error("the PDF could not be parsed: {0}")]
    Parse(String),

    #[error("no extractable text found in the document")]
    NoText,
}

/// Extracts plain text from a PDF held in memory.
///
/// Per-page text is trimmed, empty pages are dropped, the rest are joined with
/// `\n` and the final result is trimmed. A readable PDF without any text yields
/// an empty string; callers decide whether that is an error.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ExtractionError::UnsupportedFormat);
    }

    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Parse(e.to_string()))?;

    // BTreeMap keys: page numbers in ascending order
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let page_count = page_numbers.len();

    let pages: Vec<String> = page_numbers
        .into_iter()
        .filter_map(|page_number| match doc.extract_text(&[page_number]) {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                debug!("Page {page_number}: no extractable text ({e})");
                None
            }
        })
        .filter(|text| !text.is_empty())
        .collect();

    debug!(
        "Extracted text from {}/{} pages",
        pages.len(),
        page_count
    );

    if !pages.is_empty() {
        return Ok(pages.join("\n").trim().to_string());
    }

    Ok(fallback_extract(bytes))
}

/// Whole-document pass with `pdf-extract`; its page breaks are not reliable, so
/// blank lines are collapsed instead of kept as separators.
fn fallback_extract(bytes: &[u8]) -> String {
    // pdf-extract panics on some malformed inputs
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));
    match result {
        Ok(Ok(text)) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Ok(Err(e)) => {
            debug!("pdf-extract fallback failed: {e}");
            String::new()
        }
        Err(_) => {
            warn!("pdf-extract fallback panicked");
            String::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds an in-memory PDF with one page per entry. `None` pages carry an
    /// empty content stream, like an image-only scan.
    pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
