//! MetricSink trait - fan-out output interface
//!
//! Defines the abstract interface for metric sinks.

use crate::{ContractError, MetricsReport};

/// Metric output trait
///
/// All sink implementations must implement this trait. Every sink owns
/// exactly one underlying connection, established lazily: `deliver` and
/// `start` call `connect` themselves before touching the resource, so the
/// connect guarantee lives in the sink, not at call sites.
#[trait_variant::make(MetricSink: Send)]
pub trait LocalMetricSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Establish the underlying connection
    ///
    /// Idempotent: returns immediately when already connected. The initial
    /// connection attempt runs through the sink's own `BackoffPolicy`;
    /// once connected, no reconnection is attempted mid-run.
    async fn connect(&mut self) -> Result<(), ContractError>;

    /// One-time setup before consuming (connect plus e.g. schema creation)
    async fn start(&mut self) -> Result<(), ContractError>;

    /// Deliver one metrics report
    ///
    /// # Errors
    /// Returns delivery error (should include sink identity)
    async fn deliver(&mut self, report: &MetricsReport) -> Result<(), ContractError>;

    /// Release the connection; no-op when never connected
    async fn shutdown(&mut self) -> Result<(), ContractError>;
}
