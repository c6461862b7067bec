//! Prober - single bounded HTTP GET against a monitored URL.

use std::time::Duration;

use chrono::Utc;
use contracts::ProbeResult;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::ProbeError;

/// HTTP probe collaborator.
///
/// One `Prober` is shared by all jobs of a process; each probe is an
/// independent GET with the configured timeout applied to the whole
/// request, body read included.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    /// Create a prober with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder().build().map_err(ProbeError::Client)?;
        Ok(Self { client, timeout })
    }

    /// Issue one GET against `url`.
    ///
    /// # Errors
    /// Transport failure or timeout; a non-2xx status is a regular result.
    #[instrument(name = "probe", skip(self))]
    pub async fn probe(&self, url: &str) -> Result<ProbeResult, ProbeError> {
        let request_start_at = Utc::now();

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProbeError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let response_status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let response_body = response.bytes().await.map_err(|e| ProbeError::Request {
            url: url.to_string(),
            source: e,
        })?;
        let response_received_at = Utc::now();

        debug!(
            url,
            status = response_status,
            bytes = response_body.len(),
            "Probe completed"
        );

        Ok(ProbeResult {
            url: url.to_string(),
            request_start_at,
            response_received_at,
            response_headers,
            response_body,
            response_status,
        })
    }
}
