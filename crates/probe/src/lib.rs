//! # Probe
//!
//! HTTP probe collaborator and metric derivation.
//!
//! Responsibilities:
//! - Issue a single bounded GET against a monitored URL
//! - Capture timing, status, headers and raw body
//! - Derive a `MetricsReport` from the raw outcome
//!
//! A non-2xx status is a regular outcome; only transport-level failures
//! (connect error, timeout) are errors.

mod derive;
mod error;
mod prober;

pub use derive::collect_metrics;
pub use error::ProbeError;
pub use prober::Prober;
