//! # sitewatch CLI
//!
//! Entry point for both processes:
//! - `sitewatch monitor` probes URLs on their cron schedules and
//!   publishes metrics to the queue
//! - `sitewatch listen` consumes the queue and stores metrics
//! - `sitewatch validate` checks a schedule file

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_listen, run_monitor, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "sitewatch starting");

    let result = match &cli.command {
        Commands::Monitor(args) => run_monitor(args).await,
        Commands::Listen(args) => run_listen(args).await,
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options.
///
/// Log setup is owned by the observability crate; the commands install
/// the Prometheus exporter separately via `init_metrics_only`.
fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(observability::ObservabilityConfig {
        log_format: cli.log_format.clone().into(),
        metrics_port: None,
        default_log_level: log_level(cli).to_string(),
    })
}

fn log_level(cli: &Cli) -> &'static str {
    if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
