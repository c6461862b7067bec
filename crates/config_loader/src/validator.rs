//! Schedule validation
//!
//! Rules:
//! - url is a valid absolute URL
//! - schedule expression is non-empty
//! - body_regex compiles
//! - at least one job
//!
//! A malformed entry fails the whole load; entries are never skipped.

use contracts::{ContractError, ScheduleEntry};
use validator::Validate;

use crate::parser::Schedule;

/// Validate a parsed schedule document.
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(schedule: &Schedule) -> Result<(), ContractError> {
    if schedule.jobs.is_empty() {
        return Err(ContractError::config_validation(
            "jobs",
            "schedule contains no jobs",
        ));
    }
    for (idx, entry) in schedule.jobs.iter().enumerate() {
        validate_entry(idx, entry)?;
    }
    Ok(())
}

fn validate_entry(idx: usize, entry: &ScheduleEntry) -> Result<(), ContractError> {
    entry.validate().map_err(|e| {
        ContractError::config_validation(format!("jobs[{idx}] (url={})", entry.url), e.to_string())
    })?;

    // Only http(s) targets can be probed
    if !entry.url.starts_with("http://") && !entry.url.starts_with("https://") {
        return Err(ContractError::config_validation(
            format!("jobs[{idx}].url"),
            format!("'{}' is not an http(s) URL", entry.url),
        ));
    }

    if let Some(pattern) = &entry.body_regex {
        regex::Regex::new(pattern).map_err(|e| {
            ContractError::config_validation(
                format!("jobs[{idx}].body_regex"),
                format!("invalid regex: {e}"),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, regex: Option<&str>) -> ScheduleEntry {
        ScheduleEntry {
            url: url.to_string(),
            schedule: "* * * * * *".to_string(),
            body_regex: regex.map(String::from),
        }
    }

    #[test]
    fn test_valid_schedule() {
        let schedule = Schedule {
            jobs: vec![entry("https://example.com", Some("OK"))],
        };
        assert!(validate(&schedule).is_ok());
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let schedule = Schedule { jobs: vec![] };
        assert!(validate(&schedule).is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let schedule = Schedule {
            jobs: vec![entry("not a url", None)],
        };
        let err = validate(&schedule).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let schedule = Schedule {
            jobs: vec![entry("ftp://example.com/file", None)],
        };
        assert!(validate(&schedule).is_err());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let schedule = Schedule {
            jobs: vec![entry("https://example.com", Some("[unclosed"))],
        };
        let err = validate(&schedule).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_one_bad_entry_fails_whole_schedule() {
        let schedule = Schedule {
            jobs: vec![
                entry("https://example.com", None),
                entry("://broken", None),
            ],
        };
        assert!(validate(&schedule).is_err());
    }
}
