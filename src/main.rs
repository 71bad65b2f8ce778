//! safra-engine - Agricultural Fleet Telemetry Intelligence
//!
//! Ingests raw fleet telemetry exports (`;`-delimited text) and generates
//! structured operational reports per crew and report type.
//!
//! # Usage
//!
//! ```bash
//! # Daily harvest report for fronts 1 and 2
//! safra-engine --harvester colhedoras.txt \
//!     --front 1 --front 2 \
//!     --report-type colheita_diario \
//!     --date 2025-05-10 --output-dir ./output
//!
//! # Harvest + cart reports in one batch
//! safra-engine --harvester colhedoras.txt --cart transbordos.txt \
//!     --front 1 --report-type colheita_diario --report-type transbordo_diario \
//!     --date 2025-05-10
//! ```
//!
//! # Environment Variables
//!
//! - `SAFRA_CONFIG`: Path to an engine config TOML (thresholds, targets,
//!   operator aliases)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use safra_engine::{BatchRequest, BatchRunner, EngineConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "safra-engine")]
#[command(about = "Agricultural fleet telemetry aggregation engine")]
#[command(version)]
struct CliArgs {
    /// Harvester ("colhedora") telemetry export
    #[arg(long, value_name = "FILE")]
    harvester: Option<PathBuf>,

    /// Grain-cart ("transbordo") telemetry export
    #[arg(long, value_name = "FILE")]
    cart: Option<PathBuf>,

    /// Crew/front to report on (repeatable)
    #[arg(long = "front", value_name = "FRONT", required = true)]
    fronts: Vec<String>,

    /// Report type to generate (repeatable), e.g. colheita_diario
    #[arg(long = "report-type", value_name = "TYPE", required = true)]
    report_types: Vec<String>,

    /// Report date (ISO format)
    #[arg(long)]
    date: String,

    /// Range end for weekly report types
    #[arg(long)]
    date_end: Option<String>,

    /// Engine configuration TOML (defaults to $SAFRA_CONFIG or
    /// ./safra_config.toml)
    #[arg(long, env = "SAFRA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for generated JSON reports (stdout when omitted)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::load(),
    };

    let runner = BatchRunner::new(config);
    let request = BatchRequest {
        harvester_file: args.harvester.clone(),
        cart_file: args.cart.clone(),
        fronts: args.fronts.clone(),
        report_types: args.report_types.clone(),
        date: args.date.clone(),
        date_end: args.date_end.clone(),
    };

    let task_id = format!("cli-{}", std::process::id());
    let reports = runner.process_files(&task_id, request).await?;

    if let Some(status) = runner.task_status(&task_id).await {
        info!(
            total = status.total_reports,
            completed = status.completed_reports,
            generated = reports.len(),
            "Batch finished"
        );
    }

    for (key, report) in &reports {
        let json = if args.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        match &args.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                let path = dir.join(format!("{key}.json"));
                std::fs::write(&path, &json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(report = %path.display(), "Report written");
            }
            None => println!("{json}"),
        }
    }

    Ok(())
}
