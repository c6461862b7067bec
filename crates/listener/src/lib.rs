//! Queue-driven metrics listener.
//!
//! Consumes `MetricsReport` messages from the relay subject and fans
//! each one out to a set of storage collectors. The process stays up
//! across bad messages and collector hiccups; only startup failures
//! (collector start, relay connect, subscribe) are fatal.

use std::time::Duration;

use bytes::Bytes;
use contracts::{BackoffPolicy, MetricSink, MetricsReport};
use futures::{Stream, StreamExt};
use metrics::counter;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

mod error;

pub use error::ListenerError;

/// Bound on each collector's start (connect + schema) at boot
const COLLECTOR_START_TIMEOUT: Duration = Duration::from_secs(10);
/// Bound on each collector's shutdown after the consume loop exits
const COLLECTOR_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Relay endpoint the listener consumes from.
#[derive(Debug, Clone)]
pub struct ListenerSettings {
    pub server_url: String,
    pub subject: String,
}

/// Long-running consumer binding one subscription to a collector set.
pub struct MetricsListener<C: MetricSink> {
    settings: ListenerSettings,
    collectors: Vec<C>,
    backoff: BackoffPolicy,
}

impl<C: MetricSink> MetricsListener<C> {
    pub fn new(settings: ListenerSettings, collectors: Vec<C>) -> Self {
        Self {
            settings,
            collectors,
            backoff: BackoffPolicy::new(3, Duration::from_secs(10), Duration::from_secs(10)),
        }
    }

    /// Start collectors, connect to the relay and consume until `cancel`
    /// fires or the subscription ends.
    #[instrument(name = "listener_run", skip(self, cancel), fields(subject = %self.settings.subject))]
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), ListenerError> {
        dispatcher::start_all(&mut self.collectors, COLLECTOR_START_TIMEOUT).await?;
        info!(collectors = self.collectors.len(), "Collectors started");

        let server_url = self.settings.server_url.clone();
        let client = self
            .backoff
            .run("relay connect", || async_nats::connect(server_url.clone()))
            .await?;
        let mut subscriber = client
            .subscribe(self.settings.subject.clone())
            .await
            .map_err(|e| ListenerError::Subscribe {
                subject: self.settings.subject.clone(),
                message: e.to_string(),
            })?;
        info!(server_url = %self.settings.server_url, "Consuming messages");

        let stream = (&mut subscriber).map(|message| message.payload);
        self.consume(stream, &cancel).await;

        if let Err(e) = subscriber.unsubscribe().await {
            warn!(error = %e, "Failed to unsubscribe cleanly");
        }
        dispatcher::shutdown_all(&mut self.collectors, COLLECTOR_SHUTDOWN_TIMEOUT).await;
        info!("Listener stopped");
        Ok(())
    }

    /// Consume payloads until the stream ends or cancellation fires.
    ///
    /// Kept generic over the payload stream so the loop is testable
    /// without a live relay.
    async fn consume<St>(&mut self, mut stream: St, cancel: &CancellationToken)
    where
        St: Stream<Item = Bytes> + Unpin,
    {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                next = stream.next() => match next {
                    Some(payload) => self.handle_payload(&payload).await,
                    None => break,
                },
            }
        }
    }

    async fn handle_payload(&mut self, payload: &[u8]) {
        let report: MetricsReport = match serde_json::from_slice(payload) {
            Ok(report) => report,
            Err(e) => {
                counter!("sitewatch_messages_dropped_total").increment(1);
                error!(error = %e, "Discarding undecodable message");
                return;
            }
        };
        counter!("sitewatch_messages_consumed_total").increment(1);
        if let Err(e) = dispatcher::dispatch(&report, &mut self.collectors).await {
            error!(url = %report.url, error = %e, "Failed to store report");
        }
    }
}
