//! Layered error definitions
//!
//! Categorized by source: config / retry / sink / wire

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Retry Errors =====
    /// All attempts of a retried operation failed; the resource is
    /// unavailable for the rest of the process lifetime.
    #[error("max retries exceeded for '{operation}', cannot recover")]
    MaxRetriesExceeded { operation: String },

    // ===== Sink Errors =====
    /// Sink connection error
    #[error("sink '{sink_name}' connection error: {message}")]
    SinkConnection { sink_name: String, message: String },

    /// Sink delivery error
    #[error("sink '{sink_name}' delivery error: {message}")]
    SinkDeliver { sink_name: String, message: String },

    /// A sink operation ran without an established connection.
    /// The connect-before-use guard was bypassed; fatal, never retried.
    #[error("sink '{sink_name}' used while disconnected (connect guard bypassed)")]
    UninitializedResource { sink_name: String },

    // ===== Wire Errors =====
    /// Report encode/decode error
    #[error("wire format error: {message}")]
    Wire { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink connection error
    pub fn sink_connection(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkConnection {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink delivery error
    pub fn sink_deliver(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkDeliver {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create uninitialized-resource error
    pub fn uninitialized(sink_name: impl Into<String>) -> Self {
        Self::UninitializedResource {
            sink_name: sink_name.into(),
        }
    }

    /// Create wire format error
    pub fn wire(message: impl Into<String>) -> Self {
        Self::Wire {
            message: message.into(),
        }
    }
}
