//! RelaySink - publishes reports to a NATS subject
//!
//! The loader side of the inter-process queue: each delivered report is
//! JSON-encoded and published to the configured subject, then flushed so
//! delivery is acknowledged by the server before the call returns.

use std::time::Duration;

use contracts::{BackoffPolicy, ContractError, MetricSink, MetricsReport};
use tracing::{debug, instrument};

/// Configuration for RelaySink
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// NATS server address, e.g. `nats://localhost:4222`
    pub server_url: String,
    /// Subject the reports are published to
    pub subject: String,
}

/// Sink that relays reports into the inter-process queue.
pub struct RelaySink {
    name: String,
    settings: RelaySettings,
    conn: Option<async_nats::Client>,
    backoff: BackoffPolicy,
}

impl RelaySink {
    /// Create a new RelaySink; the connection is established lazily.
    pub fn new(name: impl Into<String>, settings: RelaySettings) -> Self {
        Self {
            name: name.into(),
            settings,
            conn: None,
            // A fresh broker can take tens of seconds to come up
            backoff: BackoffPolicy::new(3, Duration::from_secs(10), Duration::from_secs(10)),
        }
    }
}

impl MetricSink for RelaySink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "relay_sink_connect", skip(self), fields(sink = %self.name))]
    async fn connect(&mut self) -> Result<(), ContractError> {
        if self.conn.is_some() {
            return Ok(());
        }
        let url = self.settings.server_url.clone();
        let backoff = self.backoff;
        let client = backoff
            .run("nats connect", || async_nats::connect(url.clone()))
            .await?;
        debug!(sink = %self.name, server = %self.settings.server_url, "Connected to NATS");
        self.conn = Some(client);
        Ok(())
    }

    async fn start(&mut self) -> Result<(), ContractError> {
        self.connect().await
    }

    #[instrument(name = "relay_sink_deliver", skip(self, report), fields(sink = %self.name, url = %report.url))]
    async fn deliver(&mut self, report: &MetricsReport) -> Result<(), ContractError> {
        self.connect().await?;
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| ContractError::uninitialized(&self.name))?;

        let payload = serde_json::to_vec(report).map_err(|e| ContractError::wire(e.to_string()))?;

        conn.publish(self.settings.subject.clone(), payload.into())
            .await
            .map_err(|e| ContractError::sink_deliver(&self.name, e.to_string()))?;
        // Wait until the server has taken the message
        conn.flush()
            .await
            .map_err(|e| ContractError::sink_deliver(&self.name, e.to_string()))?;

        debug!(sink = %self.name, subject = %self.settings.subject, "Report published");
        Ok(())
    }

    #[instrument(name = "relay_sink_shutdown", skip(self), fields(sink = %self.name))]
    async fn shutdown(&mut self) -> Result<(), ContractError> {
        if let Some(conn) = self.conn.take() {
            conn.flush()
                .await
                .map_err(|e| ContractError::sink_deliver(&self.name, e.to_string()))?;
        }
        debug!(sink = %self.name, "RelaySink shutdown complete");
        Ok(())
    }
}
