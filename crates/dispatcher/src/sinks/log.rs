//! LogSink - logs report summary via tracing

use contracts::{ContractError, MetricSink, MetricsReport};
use tracing::{info, instrument};

/// Sink that logs report summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MetricSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&mut self) -> Result<(), ContractError> {
        // No underlying resource
        Ok(())
    }

    async fn start(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "log_sink_deliver", skip(self, report), fields(sink = %self.name))]
    async fn deliver(&mut self, report: &MetricsReport) -> Result<(), ContractError> {
        info!(
            sink = %self.name,
            url = %report.url,
            response_time = report.response_time,
            status_code = report.status_code,
            regex_found = ?report.regex_found,
            "MetricsReport received"
        );
        Ok(())
    }

    #[instrument(name = "log_sink_shutdown", skip(self))]
    async fn shutdown(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
