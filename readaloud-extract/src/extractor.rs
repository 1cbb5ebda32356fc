//! Per-page extraction fold
//!
//! Iterates pages in order, catching each page's decode failure locally
//! and recording it as a tagged outcome instead of aborting. The only
//! whole-extraction failure at this level is a document with no readable
//! text at all.

use crate::error::ExtractError;
use crate::reader::PageReader;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Silent-reading speed used for the reading-time estimate. Distinct
/// from the 150 wpm listening rate in readaloud-speech; the two are
/// tunable independently.
pub const READING_WORDS_PER_MINUTE: usize = 200;

/// Page cap for the preview variant.
pub const PREVIEW_PAGE_LIMIT: u32 = 10;

/// Outcome of extracting a single page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PageOutcome {
    Extracted { page: u32, text: String },
    Failed { page: u32, reason: String },
}

impl PageOutcome {
    pub fn page(&self) -> u32 {
        match self {
            PageOutcome::Extracted { page, .. } | PageOutcome::Failed { page, .. } => *page,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed { .. })
    }
}

/// Result of a whole-document (or range) extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Page count of the whole document, not of the requested range.
    pub page_count: u32,
    /// Per-page outcomes for the processed range, in page order.
    pub pages: Vec<PageOutcome>,
    /// Concatenated text with `[page N unreadable]` markers standing in
    /// for failed pages.
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
    pub estimated_reading_minutes: u64,
}

/// A 1-based inclusive page range. Out-of-bounds or inverted ranges are
/// clamped by the extractor, never rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Normalize to an in-bounds (start, end) pair, or `None` when the
    /// document has no pages.
    fn clamp_to(self, page_count: u32) -> Option<(u32, u32)> {
        if page_count == 0 {
            return None;
        }
        let (mut start, mut end) = (self.start, self.end);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        Some((start.clamp(1, page_count), end.clamp(1, page_count)))
    }
}

/// Extract the given page range, defaulting to the full document.
pub fn extract(
    reader: &dyn PageReader,
    range: Option<PageRange>,
) -> Result<ExtractionResult, ExtractError> {
    let page_count = reader.page_count();
    let range = range.unwrap_or(PageRange::new(1, page_count.max(1)));
    extract_range(reader, page_count, range)
}

/// Preview variant: first min(10, page_count) pages.
pub fn extract_preview(reader: &dyn PageReader) -> Result<ExtractionResult, ExtractError> {
    let page_count = reader.page_count();
    let range = PageRange::new(1, page_count.min(PREVIEW_PAGE_LIMIT).max(1));
    extract_range(reader, page_count, range)
}

fn extract_range(
    reader: &dyn PageReader,
    page_count: u32,
    range: PageRange,
) -> Result<ExtractionResult, ExtractError> {
    let span = range.clamp_to(page_count);

    let mut pages = Vec::new();
    let mut parts: Vec<String> = Vec::new();
    let mut any_readable = false;

    if let Some((start, end)) = span {
        for page in start..=end {
            match reader.read_page(page) {
                Ok(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        any_readable = true;
                        parts.push(trimmed.to_string());
                    }
                    pages.push(PageOutcome::Extracted { page, text });
                }
                Err(reason) => {
                    // One bad page must never abort the extraction.
                    warn!(page, %reason, "page extraction failed, continuing");
                    parts.push(format!("[page {} unreadable]", page));
                    pages.push(PageOutcome::Failed { page, reason });
                }
            }
        }
    }

    if !any_readable {
        debug!(page_count, "extraction produced no readable text");
        return Err(ExtractError::NoReadableText);
    }

    let text = parts.join("\n\n").trim().to_string();
    let word_count = text.split_whitespace().count();
    let char_count = text.chars().count();
    let estimated_reading_minutes = ((word_count / READING_WORDS_PER_MINUTE) as u64).max(1);

    Ok(ExtractionResult {
        page_count,
        pages,
        text,
        word_count,
        char_count,
        estimated_reading_minutes,
    })
}
