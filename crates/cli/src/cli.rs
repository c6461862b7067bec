//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sitewatch - periodic URL health monitoring
#[derive(Parser, Debug)]
#[command(
    name = "sitewatch",
    author,
    version,
    about = "Periodic URL health monitoring over a message queue",
    long_about = "Probes a fixed set of URLs on per-URL cron schedules and publishes \n\
                  the measured metrics to a queue. A separate listener process \n\
                  consumes the queue and stores the metrics in PostgreSQL."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SITEWATCH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SITEWATCH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the probing process (scheduler + queue producer)
    Monitor(MonitorArgs),

    /// Run the storage process (queue consumer + collectors)
    Listen(ListenArgs),

    /// Validate a schedule file without running
    Validate(ValidateArgs),
}

/// Arguments for the `monitor` command
#[derive(Parser, Debug, Clone)]
pub struct MonitorArgs {
    /// Path to schedule file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "schedule.toml",
        env = "SITEWATCH_SCHEDULE"
    )]
    pub schedule: PathBuf,

    /// NATS server address
    #[arg(
        long,
        default_value = "nats://localhost:4222",
        env = "SITEWATCH_NATS_URL"
    )]
    pub nats_url: String,

    /// Subject metrics are published to
    #[arg(long, default_value = "sitewatch.metrics", env = "SITEWATCH_SUBJECT")]
    pub subject: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", env = "SITEWATCH_REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    /// Additionally log every published report
    #[arg(long)]
    pub log_reports: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "SITEWATCH_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate the schedule and exit without probing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `listen` command
#[derive(Parser, Debug, Clone)]
pub struct ListenArgs {
    /// NATS server address
    #[arg(
        long,
        default_value = "nats://localhost:4222",
        env = "SITEWATCH_NATS_URL"
    )]
    pub nats_url: String,

    /// Subject metrics are consumed from
    #[arg(long, default_value = "sitewatch.metrics", env = "SITEWATCH_SUBJECT")]
    pub subject: String,

    /// PostgreSQL connection string
    #[arg(long, env = "SITEWATCH_POSTGRES_DSN")]
    pub postgres_dsn: String,

    /// Table the reports are written into
    #[arg(long, default_value = "metrics", env = "SITEWATCH_POSTGRES_TABLE")]
    pub table: String,

    /// Additionally log every stored report
    #[arg(long)]
    pub log_reports: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9001", env = "SITEWATCH_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to schedule file to validate
    #[arg(short, long, default_value = "schedule.toml")]
    pub schedule: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
