//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::OrderxError;
use crate::invoice::rules::QuantityPolicy;
use crate::models::order::AddressSchema;

/// Main configuration for the orderx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderxConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Order field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum vertical distance (page units) from a line's first fragment.
    pub line_tolerance: f32,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 5.0,
            max_pages: 0,
        }
    }
}

/// How the quantity is located on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityMode {
    /// Line right after the "Qty Shipped" label.
    #[default]
    AfterMarker,
    /// Fixed line index (see `quantity_line`).
    FixedLine,
}

/// Order field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Address fields expected by the consumer.
    pub schema: AddressSchema,

    /// Quantity lookup mode for the invoice template version.
    pub quantity_mode: QuantityMode,

    /// Line index read in `fixed_line` mode.
    pub quantity_line: usize,

    /// Model number lines must come after this line index.
    pub model_min_index: usize,

    /// Model number lines must be shorter than this many characters.
    pub model_max_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            schema: AddressSchema::Split,
            quantity_mode: QuantityMode::AfterMarker,
            quantity_line: 24,
            model_min_index: 5,
            model_max_len: 30,
        }
    }
}

impl ExtractionConfig {
    /// Resolve the quantity policy for this template version.
    pub fn quantity_policy(&self) -> QuantityPolicy {
        match self.quantity_mode {
            QuantityMode::AfterMarker => QuantityPolicy::AfterMarker,
            QuantityMode::FixedLine => QuantityPolicy::FixedLine(self.quantity_line),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name prefix for tabular downloads.
    pub file_prefix: String,

    /// Remote spreadsheet append endpoint.
    pub sheet_url: Option<String>,

    /// Bearer token sent to the append endpoint.
    pub sheet_token: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "home_depot_orders".to_string(),
            sheet_url: None,
            sheet_token: None,
        }
    }
}

impl OrderxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Reject settings the extractor cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        let tolerance = self.pdf.line_tolerance;
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(OrderxError::Config(format!(
                "pdf.line_tolerance must be positive, got {}",
                tolerance
            )));
        }
        if self.extraction.model_max_len == 0 {
            return Err(OrderxError::Config(
                "extraction.model_max_len must be at least 1".to_string(),
            ));
        }
        if self.export.file_prefix.trim().is_empty() {
            return Err(OrderxError::Config(
                "export.file_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
