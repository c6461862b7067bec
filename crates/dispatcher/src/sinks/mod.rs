//! Sink implementations
//!
//! Contains RelaySink (queue), PostgresSink (storage) and LogSink, plus
//! the `SinkKind` tagged variant used to hold a heterogeneous sink set.

mod log;
mod postgres;
mod relay;

pub use self::log::LogSink;
pub use self::postgres::{PostgresSettings, PostgresSink};
pub use self::relay::{RelaySettings, RelaySink};

use contracts::{ContractError, MetricSink, MetricsReport};

/// Tagged-variant capability over the concrete sinks.
///
/// New sink kinds are added by implementing `MetricSink` and extending
/// this enum; the fan-out code never changes.
pub enum SinkKind {
    Relay(RelaySink),
    Postgres(PostgresSink),
    Log(LogSink),
}

impl MetricSink for SinkKind {
    fn name(&self) -> &str {
        match self {
            Self::Relay(s) => s.name(),
            Self::Postgres(s) => s.name(),
            Self::Log(s) => s.name(),
        }
    }

    async fn connect(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Relay(s) => s.connect().await,
            Self::Postgres(s) => s.connect().await,
            Self::Log(s) => s.connect().await,
        }
    }

    async fn start(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Relay(s) => s.start().await,
            Self::Postgres(s) => s.start().await,
            Self::Log(s) => s.start().await,
        }
    }

    async fn deliver(&mut self, report: &MetricsReport) -> Result<(), ContractError> {
        match self {
            Self::Relay(s) => s.deliver(report).await,
            Self::Postgres(s) => s.deliver(report).await,
            Self::Log(s) => s.deliver(report).await,
        }
    }

    async fn shutdown(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Relay(s) => s.shutdown().await,
            Self::Postgres(s) => s.shutdown().await,
            Self::Log(s) => s.shutdown().await,
        }
    }
}
