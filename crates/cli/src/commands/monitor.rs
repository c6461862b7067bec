//! `monitor` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use dispatcher::{LogSink, RelaySettings, RelaySink, SinkKind};
use scheduler::ProbeScheduler;

use super::setup_shutdown_signal;
use crate::cli::MonitorArgs;

/// Execute the `monitor` command
pub async fn run_monitor(args: &MonitorArgs) -> Result<()> {
    info!(schedule = %args.schedule.display(), "Loading schedule");

    if !args.schedule.exists() {
        anyhow::bail!("Schedule file not found: {}", args.schedule.display());
    }

    let schedule = config_loader::ConfigLoader::load_from_path(&args.schedule)
        .with_context(|| format!("Failed to load schedule from {}", args.schedule.display()))?;

    info!(jobs = schedule.jobs.len(), "Schedule loaded");

    // Dry run - check the cron expressions as well and exit
    if args.dry_run {
        for entry in &schedule.jobs {
            scheduler::validate_expression(&entry.schedule)
                .with_context(|| format!("Invalid schedule for {}", entry.url))?;
        }
        info!("Dry run mode - schedule is valid, exiting");
        print_schedule_summary(&schedule);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut sinks = vec![SinkKind::Relay(RelaySink::new(
        "relay",
        RelaySettings {
            server_url: args.nats_url.clone(),
            subject: args.subject.clone(),
        },
    ))];
    if args.log_reports {
        sinks.push(SinkKind::Log(LogSink::new("stdout")));
    }

    let mut probe_scheduler = ProbeScheduler::new(
        schedule.jobs,
        sinks,
        Duration::from_secs(args.request_timeout),
    )
    .await
    .context("Failed to build scheduler")?;

    probe_scheduler.start().await?;
    info!("Monitor running, press Ctrl+C to stop");

    setup_shutdown_signal().await;
    warn!("Received shutdown signal, stopping monitor...");

    probe_scheduler.shutdown().await?;
    info!("Monitor finished");
    Ok(())
}

/// Print schedule summary for dry-run mode
fn print_schedule_summary(schedule: &config_loader::Schedule) {
    println!("\n=== Schedule Summary ===\n");
    println!("Jobs ({}):", schedule.jobs.len());
    for entry in &schedule.jobs {
        match &entry.body_regex {
            Some(pattern) => println!(
                "  - {} [{}] body ~ /{}/",
                entry.url, entry.schedule, pattern
            ),
            None => println!("  - {} [{}]", entry.url, entry.schedule),
        }
    }
    println!();
}
