//! # Scheduler
//!
//! Scheduled-execution module for the producer process.
//!
//! Responsibilities:
//! - Turn each `ScheduleEntry` into an `ExclusiveJob` bound to a cron trigger
//! - Guarantee at most one in-flight execution per job
//! - Publish derived reports to the loader sink set
//!
//! A shutdown disarms all triggers first; executions already in flight
//! are not force-cancelled.

mod error;
mod job;
mod probe_scheduler;

pub use error::SchedulerError;
pub use job::ExclusiveJob;
pub use probe_scheduler::{validate_expression, ProbeScheduler};
