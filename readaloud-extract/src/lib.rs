//! readaloud-extract: resilient per-page text extraction
//!
//! Opens a paginated document and produces page-indexed text with
//! per-page fault isolation: one unreadable page never aborts the whole
//! extraction. Page access sits behind the [`PageReader`] trait so the
//! PDF backend can be swapped out (or faults injected) in tests.

pub mod error;
pub mod extractor;
pub mod reader;

pub use error::ExtractError;
pub use extractor::{
    extract, extract_preview, ExtractionResult, PageOutcome, PageRange,
    PREVIEW_PAGE_LIMIT, READING_WORDS_PER_MINUTE,
};
pub use reader::{PageReader, PdfPageReader};
