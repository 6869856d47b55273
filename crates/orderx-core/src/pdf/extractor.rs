//! Positioned text extraction using lopdf.

use lopdf::content::Content;
use lopdf::Document;
use tracing::debug;

use super::content::collect_fragments;
use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::layout::PositionedFragment;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { document: None }
    }

    /// Create an extractor with a document loaded from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        Ok(extractor)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<PositionedFragment>> {
        let doc = self.document()?;

        let pages = doc.get_pages();
        let page_id = *pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
        let data = doc
            .get_page_content(page_id)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let content = Content::decode(&data).map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let fragments = collect_fragments(doc, &fonts, &content);
        debug!("Page {}: {} text fragments", page, fragments.len());
        Ok(fragments)
    }
}
