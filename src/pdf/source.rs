// src/pdf/source.rs
use crate::utils::error::SourceError;
use lopdf::Document;
use std::path::Path;

/// Number of leading pages scanned by default. The abstract sits at the front
/// of a paper, so the whole document rarely needs decoding.
pub const DEFAULT_MAX_PAGES: usize = 3;

/// Extracts text from the first `max_pages` pages of a PDF.
/// `max_pages == 0` scans the whole document.
pub fn extract_text(path: &Path, max_pages: usize) -> Result<String, SourceError> {
    let document =
        Document::load(path).map_err(|e| SourceError::Open(path.display().to_string(), e))?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(SourceError::NoText(path.display().to_string()));
    }

    let page_numbers: Vec<u32> = if max_pages == 0 {
        pages.keys().copied().collect()
    } else {
        pages.keys().copied().take(max_pages).collect()
    };

    tracing::debug!(
        "Extracting text from {} of {} pages in {}",
        page_numbers.len(),
        pages.len(),
        path.display()
    );

    let text = document
        .extract_text(&page_numbers)
        .map_err(|e| SourceError::Extract(path.display().to_string(), e))?;

    if text.trim().is_empty() {
        return Err(SourceError::NoText(path.display().to_string()));
    }

    Ok(text)
}
