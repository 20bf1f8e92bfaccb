//! PDF text extraction.
//!
//! Only text that is stored as text is recovered; image-only (scanned) pages
//! contribute nothing.

use crate::error::{document_error, AppResult};
use lopdf::Document;
use tracing::{debug, info, warn};

/// Extract the text of every page, joined with newlines.
///
/// Fails when the bytes are not a readable PDF or when no page yields text.
pub fn extract_text(pdf_bytes: &[u8]) -> AppResult<String> {
    let doc = Document::load_mem(pdf_bytes)
        .map_err(|e| document_error(&format!("Failed to open PDF: {}", e)))?;

    let pages = doc.get_pages();
    info!("Extracting text from PDF with {} page(s)", pages.len());

    let mut page_texts = Vec::with_capacity(pages.len());
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) if !text.trim().is_empty() => page_texts.push(text.trim().to_string()),
            Ok(_) => debug!("Page {} has no extractable text", page_num),
            Err(e) => warn!("Failed to extract text from page {}: {}", page_num, e),
        }
    }

    if page_texts.is_empty() {
        return Err(document_error("PDF contains no extractable text"));
    }

    Ok(page_texts.join("\n"))
}
