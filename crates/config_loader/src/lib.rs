//! # Config Loader
//!
//! Schedule definition loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON schedule files
//! - Validate entries (absolute URL, regex compiles)
//! - Produce the immutable job list both processes build on
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let schedule = ConfigLoader::load_from_path(Path::new("schedule.toml")).unwrap();
//! println!("Jobs: {}", schedule.jobs.len());
//! ```

mod parser;
mod validator;

pub use parser::{ConfigFormat, Schedule};

use contracts::ContractError;
use std::path::Path;

/// Schedule loader
///
/// Provides static methods to load the schedule from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load schedule from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<Schedule, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load schedule from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<Schedule, ContractError> {
        let schedule = parser::parse(content, format)?;
        validator::validate(&schedule)?;
        Ok(schedule)
    }
}

impl ConfigLoader {
    /// Infer schedule format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported schedule format: .{ext}"))
        })
    }

    /// Read schedule file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
