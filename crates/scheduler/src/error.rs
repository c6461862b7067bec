//! Scheduler error types

use thiserror::Error;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Underlying cron scheduler error
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// Unparseable recurrence expression; fails process startup
    #[error("invalid schedule expression '{expr}': {message}")]
    InvalidSchedule { expr: String, message: String },

    /// Unparseable body regex; fails process startup
    #[error("invalid body regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// Probe collaborator setup error
    #[error(transparent)]
    Probe(#[from] probe::ProbeError),
}

impl SchedulerError {
    pub(crate) fn scheduler(e: impl std::fmt::Display) -> Self {
        Self::Scheduler(e.to_string())
    }
}
