//! Metric derivation - interprets a probe outcome into a MetricsReport.

use contracts::{MetricsReport, ProbeResult};
use regex::Regex;

use crate::error::ProbeError;

/// Derive a `MetricsReport` from one completed probe.
///
/// With no pattern configured, `regex_found` stays unset. The body is
/// decoded as strict UTF-8 before the search; a decode failure is a
/// probe-level error routed to the job's error callback.
pub fn collect_metrics(
    result: &ProbeResult,
    pattern: Option<&Regex>,
) -> Result<MetricsReport, ProbeError> {
    let regex_found = match pattern {
        None => None,
        Some(re) => {
            let text =
                std::str::from_utf8(&result.response_body).map_err(|_| ProbeError::BodyDecode {
                    url: result.url.clone(),
                })?;
            Some(re.is_match(text))
        }
    };

    Ok(MetricsReport {
        url: result.url.clone(),
        response_time: result.response_time(),
        status_code: result.response_status,
        regex_found,
    })
}
