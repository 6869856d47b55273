//! Error types for the orderx-core library.

use thiserror::Error;

/// Main error type for the orderx library.
#[derive(Error, Debug)]
pub enum OrderxError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Order edit error.
    #[error("edit error: {0}")]
    Edit(#[from] EditError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to read text content from a page.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised when overwriting order fields after extraction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    /// No order field has this name.
    #[error("unknown order field: {0}")]
    UnknownField(String),

    /// The order index is past the end of the batch.
    #[error("order index {index} out of range (batch has {len} orders)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The value cannot be stored in the field.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Errors related to exporting orders.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Failed to write tabular output.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to serialize the remote payload.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The remote spreadsheet endpoint rejected the append.
    #[error("remote append failed: {0}")]
    Remote(String),
}

/// Result type for the orderx library.
pub type Result<T> = std::result::Result<T, OrderxError>;
