//! Process command - extract orders from a single invoice PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use orderx_core::export::default_file_name;

use super::{
    build_extractor, extract_file, format_batch, load_config, print_issues, print_reports,
    OutputFormat, QuantityArg, SchemaArg,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Address schema (overrides config)
    #[arg(long, value_enum)]
    schema: Option<SchemaArg>,

    /// Quantity lookup (overrides config)
    #[arg(long, value_enum)]
    quantity_policy: Option<QuantityArg>,

    /// Print the clustered lines of every page
    #[arg(long)]
    lines: bool,

    /// Validate extracted orders
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Extracting orders...");

    let extractor = build_extractor(&config, args.schema, args.quantity_policy);
    let (batch, reports) = extract_file(&args.input, &config, &extractor)?;

    pb.finish_and_clear();

    if args.lines {
        print_reports(&reports);
    }

    if args.validate {
        print_issues(&batch);
    }

    let output = format_batch(&batch, args.format)?;

    if let Some(output_path) = &args.output {
        let output_path = if output_path.is_dir() {
            output_path.join(output_file_name(&args, &config.export.file_prefix))
        } else {
            output_path.clone()
        };

        fs::write(&output_path, &output)?;
        println!(
            "{} {} orders written to {}",
            style("✓").green(),
            batch.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// File name used when the output path is a directory.
fn output_file_name(args: &ProcessArgs, prefix: &str) -> String {
    match args.format {
        OutputFormat::Csv => default_file_name(prefix, chrono::Local::now().date_naive()),
        format => {
            let stem = args
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("orders");
            format!("{}.{}", stem, format.extension())
        }
    }
}
