//! Schedule entry - one recurring probe definition.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One entry of the schedule definition file.
///
/// Loaded once at startup; immutable for the process lifetime.
/// One entry yields exactly one scheduled job.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleEntry {
    /// Absolute URL to probe
    #[validate(url(message = "must be a valid absolute URL"))]
    pub url: String,

    /// Cron recurrence expression
    #[validate(length(min = 1, message = "must not be empty"))]
    pub schedule: String,

    /// Optional pattern searched in the response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_regex: Option<String>,
}
