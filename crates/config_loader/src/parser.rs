//! Schedule document parsing
//!
//! Supports TOML (primary) and JSON (optional) formats.

use contracts::{ContractError, ScheduleEntry};
use serde::{Deserialize, Serialize};

/// Schedule file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// The schedule definition document: a list of probe jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub jobs: Vec<ScheduleEntry>,
}

/// Parse TOML schedule
pub fn parse_toml(content: &str) -> Result<Schedule, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON schedule
pub fn parse_json(content: &str) -> Result<Schedule, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse schedule content in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<Schedule, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}
