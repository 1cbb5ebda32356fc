//! Page access behind a trait

use crate::error::ExtractError;
use lopdf::Document;
use std::path::Path;

/// Page-addressable document access.
///
/// Pages are 1-based positions in reading order. `read_page` returns the
/// failure reason as a string so callers can fold it into a per-page
/// outcome without aborting the surrounding extraction.
pub trait PageReader: Send + Sync {
    fn page_count(&self) -> u32;

    fn read_page(&self, page: u32) -> Result<String, String>;
}

/// PDF-backed page reader.
pub struct PdfPageReader {
    doc: Document,
    // get_pages() keys in reading order; position i is logical page i+1.
    page_numbers: Vec<u32>,
}

impl PdfPageReader {
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::AssetMissing {
                path: path.to_path_buf(),
            });
        }

        let doc = Document::load(path).map_err(|e| ExtractError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        Ok(Self { doc, page_numbers })
    }
}

impl PageReader for PdfPageReader {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn read_page(&self, page: u32) -> Result<String, String> {
        if page == 0 {
            return Err("page numbers are 1-based".to_string());
        }
        let number = self
            .page_numbers
            .get(page as usize - 1)
            .copied()
            .ok_or_else(|| format!("page {} out of range", page))?;

        self.doc
            .extract_text(&[number])
            .map_err(|e| e.to_string())
    }
}
