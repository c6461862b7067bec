//! Probe error types

use thiserror::Error;

/// Probe-specific errors
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP client construction failed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level request failure (connect error, timeout, etc.)
    #[error("request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body is not valid UTF-8, cannot run the body regex over it
    #[error("response body from '{url}' is not valid UTF-8")]
    BodyDecode { url: String },
}
