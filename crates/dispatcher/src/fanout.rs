//! Fan-out primitives - joint delivery, start and shutdown over a sink set.

use std::time::Duration;

use contracts::{ContractError, MetricSink, MetricsReport};
use futures::future::{join_all, try_join_all};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Deliver one report to every sink in the set concurrently.
///
/// All deliveries are launched together and awaited jointly: the first
/// failing sink fails the call and the still-running sibling deliveries
/// are dropped. Sinks that already completed keep their delivered state;
/// nothing is rolled back and no per-sink accounting is surfaced.
#[instrument(name = "fanout_dispatch", skip_all, fields(url = %report.url, sinks = sinks.len()))]
pub async fn dispatch<S: MetricSink>(
    report: &MetricsReport,
    sinks: &mut [S],
) -> Result<(), ContractError> {
    try_join_all(sinks.iter_mut().map(|sink| sink.deliver(report))).await?;
    Ok(())
}

/// Start every sink concurrently, each bounded by `per_sink`.
///
/// Any start failure or timeout fails the whole call; used on the
/// consumer side where a sink that cannot start makes the process useless.
#[instrument(name = "fanout_start_all", skip_all, fields(sinks = sinks.len()))]
pub async fn start_all<S: MetricSink>(
    sinks: &mut [S],
    per_sink: Duration,
) -> Result<(), ContractError> {
    try_join_all(sinks.iter_mut().map(|sink| async move {
        let name = sink.name().to_string();
        match timeout(per_sink, sink.start()).await {
            Ok(result) => result,
            Err(_) => Err(ContractError::sink_connection(
                name,
                format!("start timed out after {}s", per_sink.as_secs()),
            )),
        }
    }))
    .await?;
    Ok(())
}

/// Shut down every sink concurrently, each bounded by `per_sink`.
///
/// A sink that fails or does not finish in time is logged; shutdown of
/// the rest proceeds and the call never fails.
#[instrument(name = "fanout_shutdown_all", skip_all, fields(sinks = sinks.len()))]
pub async fn shutdown_all<S: MetricSink>(sinks: &mut [S], per_sink: Duration) {
    join_all(sinks.iter_mut().map(|sink| async move {
        let name = sink.name().to_string();
        match timeout(per_sink, sink.shutdown()).await {
            Ok(Ok(())) => debug!(sink = %name, "Sink shutdown complete"),
            Ok(Err(e)) => warn!(sink = %name, error = %e, "Sink shutdown failed"),
            Err(_) => warn!(
                sink = %name,
                timeout_secs = per_sink.as_secs(),
                "Sink shutdown timed out"
            ),
        }
    }))
    .await;
}
