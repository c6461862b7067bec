//! `validate` command implementation.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    schedule_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ScheduleSummary>,
}

#[derive(Serialize)]
struct ScheduleSummary {
    job_count: usize,
    jobs_with_regex: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(schedule = %args.schedule.display(), "Validating schedule");

    let result = validate_schedule(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Schedule validation failed")
    }
}

fn validate_schedule(args: &ValidateArgs) -> ValidationResult {
    let schedule_path = args.schedule.display().to_string();

    if !args.schedule.exists() {
        return ValidationResult {
            valid: false,
            schedule_path,
            error: Some(format!("File not found: {}", args.schedule.display())),
            warnings: None,
            summary: None,
        };
    }

    let schedule = match config_loader::ConfigLoader::load_from_path(&args.schedule) {
        Ok(schedule) => schedule,
        Err(e) => {
            return ValidationResult {
                valid: false,
                schedule_path,
                error: Some(e.to_string()),
                warnings: None,
                summary: None,
            }
        }
    };

    // Cron expressions are outside the loader's scope, check them here
    for entry in &schedule.jobs {
        if let Err(e) = scheduler::validate_expression(&entry.schedule) {
            return ValidationResult {
                valid: false,
                schedule_path,
                error: Some(e.to_string()),
                warnings: None,
                summary: None,
            };
        }
    }

    let warnings = collect_warnings(&schedule);
    let jobs_with_regex = schedule
        .jobs
        .iter()
        .filter(|entry| entry.body_regex.is_some())
        .count();

    ValidationResult {
        valid: true,
        schedule_path,
        error: None,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(ScheduleSummary {
            job_count: schedule.jobs.len(),
            jobs_with_regex,
        }),
    }
}

/// Collect schedule warnings (non-fatal issues)
fn collect_warnings(schedule: &config_loader::Schedule) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for entry in &schedule.jobs {
        if !seen.insert(entry.url.as_str()) {
            warnings.push(format!(
                "URL '{}' appears more than once - it will be probed by each entry",
                entry.url
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Schedule is valid: {}", result.schedule_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Jobs: {}", summary.job_count);
            println!("  Jobs with body regex: {}", summary.jobs_with_regex);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Schedule is invalid: {}", result.schedule_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
