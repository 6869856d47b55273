//! Core library for vendor invoice order extraction.
//!
//! This crate provides:
//! - PDF processing (positioned text fragments per page)
//! - Line clustering of fragments by vertical position
//! - Rule-based order field extraction (header, ship-to variants, items, quantity)
//! - Batch processing into an explicit order collection
//! - Export schema for tabular download and remote spreadsheet append

pub mod error;
pub mod models;
pub mod pdf;
pub mod layout;
pub mod invoice;
pub mod batch;
pub mod export;

pub use error::{OrderxError, Result};
pub use models::order::{AddressSchema, AddressType, Order};
pub use models::config::OrderxConfig;
pub use pdf::{PdfExtractor, PdfProcessor};
pub use layout::{LineClusterer, PositionedFragment};
pub use invoice::{ExtractionResult, OrderFieldExtractor};
pub use invoice::rules::QuantityPolicy;
pub use batch::{OrderBatch, PageReport, process_document, process_document_with_reports};
