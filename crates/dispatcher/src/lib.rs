//! # Dispatcher
//!
//! Fan-out module.
//!
//! Responsibilities:
//! - Deliver one `MetricsReport` to N independently pluggable sinks
//! - Joint start and shutdown over a sink set with per-sink bounds
//!
//! Delivery semantics are fail-fast: the first failing sink fails the
//! joint await and still-running sibling deliveries are dropped. Partial
//! delivery is possible and never rolled back.

pub mod fanout;
pub mod sinks;

pub use contracts::{MetricSink, MetricsReport};
pub use fanout::{dispatch, shutdown_all, start_all};
pub use sinks::{LogSink, PostgresSettings, PostgresSink, RelaySettings, RelaySink, SinkKind};
