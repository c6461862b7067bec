//! `listen` command implementation.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dispatcher::{LogSink, PostgresSettings, PostgresSink, SinkKind};
use listener::{ListenerSettings, MetricsListener};

use super::setup_shutdown_signal;
use crate::cli::ListenArgs;

/// Execute the `listen` command
pub async fn run_listen(args: &ListenArgs) -> Result<()> {
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut settings = PostgresSettings::new(args.postgres_dsn.clone());
    settings.table = args.table.clone();

    let mut collectors = vec![SinkKind::Postgres(PostgresSink::new("postgres", settings))];
    if args.log_reports {
        collectors.push(SinkKind::Log(LogSink::new("stdout")));
    }

    let metrics_listener = MetricsListener::new(
        ListenerSettings {
            server_url: args.nats_url.clone(),
            subject: args.subject.clone(),
        },
        collectors,
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        setup_shutdown_signal().await;
        warn!("Received shutdown signal, stopping listener...");
        signal_cancel.cancel();
    });

    info!("Listener running, press Ctrl+C to stop");
    metrics_listener
        .run(cancel)
        .await
        .context("Listener execution failed")?;

    info!("Listener finished");
    Ok(())
}
