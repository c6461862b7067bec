//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data Flow
//! - `ScheduleEntry` describes one recurring probe (url + cron expression)
//! - `ProbeResult` is the raw outcome of a single HTTP probe
//! - `MetricsReport` is the derived measurement, the only value crossing
//!   the process boundary (JSON, field names fixed)

mod backoff;
mod error;
mod report;
mod schedule;
mod sink;

pub use backoff::BackoffPolicy;
pub use error::*;
pub use report::{MetricsReport, ProbeResult};
pub use schedule::ScheduleEntry;
pub use sink::*;
