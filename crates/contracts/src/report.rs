//! Probe outcome and derived metrics types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw outcome of one completed HTTP probe.
///
/// Produced by the probe collaborator, consumed by metric derivation.
/// Non-2xx statuses are regular results; only transport-level failures
/// surface as errors upstream.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Probed URL
    pub url: String,
    /// Moment the request was issued
    pub request_start_at: DateTime<Utc>,
    /// Moment the full response was read
    pub response_received_at: DateTime<Utc>,
    /// Response headers as received
    pub response_headers: Vec<(String, String)>,
    /// Raw response body
    pub response_body: Bytes,
    /// HTTP status code
    pub response_status: u16,
}

impl ProbeResult {
    /// Wall-clock response time in seconds.
    pub fn response_time(&self) -> f64 {
        (self.response_received_at - self.request_start_at).as_seconds_f64()
    }
}

/// The measurement record derived from one probe.
///
/// This is the wire type shared by both processes: a flat JSON object
/// with exactly these four fields. `regex_found` serializes as `null`
/// when no pattern was configured and is tolerated missing on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub url: String,
    /// Seconds between request start and full response, >= 0
    pub response_time: f64,
    pub status_code: u16,
    #[serde(default)]
    pub regex_found: Option<bool>,
}
