//! Subcommands and the pieces they share.

pub mod batch;
pub mod config;
pub mod process;
pub mod push;

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use tracing::debug;

use orderx_core::batch::{process_document_with_reports, OrderBatch, PageReport};
use orderx_core::export::to_csv;
use orderx_core::invoice::OrderFieldExtractor;
use orderx_core::layout::LineClusterer;
use orderx_core::models::config::OrderxConfig;
use orderx_core::models::order::AddressSchema;
use orderx_core::pdf::{PdfExtractor, PdfProcessor};
use orderx_core::QuantityPolicy;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Address schema expected by the consumer of the output.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SchemaArg {
    /// One shared address field
    Single,
    /// Separate customer and ship-to addresses
    Split,
}

impl From<SchemaArg> for AddressSchema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Single => AddressSchema::Single,
            SchemaArg::Split => AddressSchema::Split,
        }
    }
}

/// Quantity lookup for the invoice template version.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum QuantityArg {
    /// Line after "Qty Shipped"
    AfterMarker,
    /// Fixed line index from the config
    FixedLine,
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orderx")
        .join("config.json")
}

/// Resolve the configuration file path from the global `--config` flag.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration: an explicit path must exist, the default path may not.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<OrderxConfig> {
    let config = match config_path {
        Some(path) => OrderxConfig::from_file(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Using config file {}", path.display());
                OrderxConfig::from_file(&path)?
            } else {
                OrderxConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

/// Build the field extractor, applying command line overrides.
pub fn build_extractor(
    config: &OrderxConfig,
    schema: Option<SchemaArg>,
    quantity: Option<QuantityArg>,
) -> OrderFieldExtractor {
    let mut extractor = OrderFieldExtractor::from_config(&config.extraction);
    if let Some(schema) = schema {
        extractor = extractor.with_schema(schema.into());
    }
    if let Some(quantity) = quantity {
        let policy = match quantity {
            QuantityArg::AfterMarker => QuantityPolicy::AfterMarker,
            QuantityArg::FixedLine => QuantityPolicy::FixedLine(config.extraction.quantity_line),
        };
        extractor = extractor.with_quantity_policy(policy);
    }
    extractor
}

/// Read a PDF and extract one order per page.
pub fn extract_file(
    path: &Path,
    config: &OrderxConfig,
    extractor: &OrderFieldExtractor,
) -> anyhow::Result<(OrderBatch, Vec<PageReport>)> {
    let data = fs::read(path)?;
    let mut pdf = PdfExtractor::new();
    pdf.load(&data)?;
    debug!("PDF has {} pages", pdf.page_count());

    let clusterer = LineClusterer::new().with_tolerance(config.pdf.line_tolerance);
    let result =
        process_document_with_reports(&pdf, &clusterer, extractor, config.pdf.max_pages)?;
    Ok(result)
}

pub fn format_batch(batch: &OrderBatch, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(batch.orders())?),
        OutputFormat::Csv => Ok(to_csv(batch)?),
        OutputFormat::Text => Ok(format_text(batch)),
    }
}

fn format_text(batch: &OrderBatch) -> String {
    let mut output = String::new();

    for order in batch.orders() {
        output.push_str(&format!("Order {} (page {})\n", order.cust_num, order.page));
        output.push_str(&format!("  PO:        {}\n", order.po_number));
        output.push_str(&format!("  Date:      {}\n", order.date));
        output.push_str(&format!("  Customer:  {}\n", order.customer_name));
        match batch.schema() {
            AddressSchema::Single => {
                output.push_str(&format!("  Ship to:   {}\n", order.customer_address));
                output.push_str(&format!("             {}\n", order.address));
            }
            AddressSchema::Split => {
                output.push_str(&format!("  Ship to:   {}\n", order.ship_to_name));
                output.push_str(&format!("             {}\n", order.ship_to_address));
                output.push_str(&format!("  Bill to:   {}\n", order.customer_address));
            }
        }
        output.push_str(&format!("  Phone:     {}\n", order.phone));
        output.push_str(&format!("  Type:      {}\n", order.address_type));
        output.push_str(&format!("  Ship via:  {}\n", order.ship_via));
        output.push_str(&format!(
            "  Item:      {} (internet #{}) x {}\n",
            order.model_number, order.internet_number, order.quantity
        ));
        output.push('\n');
    }

    output
}

/// Dump clustered lines and extraction warnings to stderr.
pub fn print_reports(reports: &[PageReport]) {
    for report in reports {
        eprintln!("{}", style(format!("Page {} lines:", report.page)).bold());
        for (index, line) in report.lines.iter().enumerate() {
            eprintln!("  Line {}: {:?}", index, line);
        }
        for warning in &report.warnings {
            eprintln!("  {} {}", style("!").yellow(), warning);
        }
    }
}

/// Print validation issues to stderr.
pub fn print_issues(batch: &OrderBatch) {
    let issues = batch.validate();
    if !issues.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
    }
}
