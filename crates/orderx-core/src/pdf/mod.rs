//! PDF processing module.

mod content;
mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use crate::layout::PositionedFragment;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
///
/// Pages are numbered from 1.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Positioned text fragments of one page, in content stream order.
    fn page_fragments(&self, page: u32) -> Result<Vec<PositionedFragment>>;
}
