//! Push command - append extracted orders to the remote spreadsheet.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use orderx_core::error::ExportError;
use orderx_core::export::{SheetPayload, SheetResponse};

use super::{build_extractor, extract_file, load_config, print_issues, QuantityArg, SchemaArg};

/// Arguments for the push command.
#[derive(Args)]
pub struct PushArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Append endpoint (overrides export.sheet_url)
    #[arg(long)]
    url: Option<String>,

    /// Bearer token (overrides export.sheet_token)
    #[arg(long, env = "ORDERX_SHEET_TOKEN")]
    token: Option<String>,

    /// Address schema (overrides config)
    #[arg(long, value_enum)]
    schema: Option<SchemaArg>,

    /// Quantity lookup (overrides config)
    #[arg(long, value_enum)]
    quantity_policy: Option<QuantityArg>,

    /// Print the payload instead of sending it
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: PushArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extractor = build_extractor(&config, args.schema, args.quantity_policy);
    let (batch, _) = extract_file(&args.input, &config, &extractor)?;

    if batch.is_empty() {
        anyhow::bail!("No orders extracted from {}", args.input.display());
    }

    print_issues(&batch);

    let payload = SheetPayload::from_batch(&batch);

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let url = args
        .url
        .or_else(|| config.export.sheet_url.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No spreadsheet URL configured. Pass --url or set export.sheet_url.")
        })?;
    let token = args.token.or_else(|| config.export.sheet_token.clone());

    info!("Sending {} orders to {}", payload.orders.len(), url);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Sending orders to spreadsheet...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let response = send(&url, token.as_deref(), &payload).await;
    pb.finish_and_clear();
    let response = response?;

    let rows = response.rows_added.unwrap_or(payload.orders.len() as u64);
    println!(
        "{} {}",
        style("✓").green(),
        response
            .message
            .unwrap_or_else(|| format!("Added {} rows", rows))
    );

    Ok(())
}

async fn send(
    url: &str,
    token: Option<&str>,
    payload: &SheetPayload,
) -> Result<SheetResponse, ExportError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("orderx-cli/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| ExportError::Remote(e.to_string()))?;

    let mut request = client.post(url).json(payload);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ExportError::Remote(e.to_string()))?;

    let status = response.status();
    debug!("Append endpoint answered HTTP {}", status);
    if !status.is_success() {
        return Err(ExportError::Remote(format!("HTTP {}", status)));
    }

    let reply: SheetResponse = response
        .json()
        .await
        .map_err(|e| ExportError::Remote(e.to_string()))?;

    if !reply.success {
        return Err(ExportError::Remote(
            reply.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    Ok(reply)
}
