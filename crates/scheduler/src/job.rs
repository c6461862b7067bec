//! ExclusiveJob - one scheduled probe guaranteed not to overlap with itself.

use std::future::Future;
use std::sync::Arc;

use contracts::{MetricsReport, ScheduleEntry};
use metrics::counter;
use probe::{collect_metrics, ProbeError, Prober};
use regex::Regex;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::SchedulerError;

/// A probe unit wrapped with a per-job mutual-exclusion gate.
///
/// A trigger that arrives while the previous run still holds the gate is
/// dropped: it is neither queued nor retried. The gate is the only lock
/// in the system and protects exactly this invariant.
pub struct ExclusiveJob {
    entry: ScheduleEntry,
    pattern: Option<Regex>,
    gate: Arc<Mutex<()>>,
}

impl ExclusiveJob {
    /// Build a job from a schedule entry, compiling the body regex once.
    pub fn from_entry(entry: ScheduleEntry) -> Result<Self, SchedulerError> {
        let pattern = entry
            .body_regex
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| SchedulerError::InvalidRegex {
                pattern: entry.body_regex.clone().unwrap_or_default(),
                message: e.to_string(),
            })?;
        Ok(Self {
            entry,
            pattern,
            gate: Arc::new(Mutex::new(())),
        })
    }

    /// The schedule entry this job was built from.
    pub fn entry(&self) -> &ScheduleEntry {
        &self.entry
    }

    /// One firing of the job.
    ///
    /// Probe, derive, then invoke exactly one of the callbacks:
    /// `on_result` with the report, or `on_error` with the entry and the
    /// probe failure. A publish failure inside `on_result` is logged here;
    /// the job stays armed either way.
    pub async fn fire<FR, RFut, FE, EFut>(&self, prober: &Prober, on_result: FR, on_error: FE)
    where
        FR: FnOnce(MetricsReport) -> RFut,
        RFut: Future<Output = Result<(), contracts::ContractError>>,
        FE: FnOnce(&ScheduleEntry, ProbeError) -> EFut,
        EFut: Future<Output = ()>,
    {
        let Ok(_guard) = self.gate.try_lock() else {
            debug!(url = %self.entry.url, "Health check still running, skipping trigger");
            counter!("sitewatch_triggers_skipped_total").increment(1);
            return;
        };

        match self.execute(prober).await {
            Ok(report) => {
                counter!("sitewatch_probes_total").increment(1);
                if let Err(e) = on_result(report).await {
                    error!(url = %self.entry.url, error = %e, "Failed to publish metrics");
                }
            }
            Err(e) => {
                counter!("sitewatch_probe_errors_total").increment(1);
                on_error(&self.entry, e).await;
            }
        }
    }

    async fn execute(&self, prober: &Prober) -> Result<MetricsReport, ProbeError> {
        let result = prober.probe(&self.entry.url).await?;
        collect_metrics(&result, self.pattern.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn entry(url: &str, body_regex: Option<&str>) -> ScheduleEntry {
        ScheduleEntry {
            url: url.to_string(),
            schedule: "* * * * * *".to_string(),
            body_regex: body_regex.map(String::from),
        }
    }

    async fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_fire_success_invokes_on_result_only() {
        let url = serve_once("<h1>Hello</h1>").await;
        let job = ExclusiveJob::from_entry(entry(&url, Some("<h1>Hello</h1>"))).unwrap();
        let prober = Prober::new(Duration::from_secs(5)).unwrap();

        let results = Arc::new(AtomicU32::new(0));
        let errors = Arc::new(AtomicU32::new(0));
        let r = Arc::clone(&results);
        let e = Arc::clone(&errors);

        job.fire(
            &prober,
            move |report| async move {
                assert_eq!(report.status_code, 200);
                assert_eq!(report.regex_found, Some(true));
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            move |_entry, _err| async move {
                e.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;

        assert_eq!(results.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fire_probe_failure_invokes_on_error_only() {
        // Bind then drop so nothing listens on the port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let job = ExclusiveJob::from_entry(entry(&format!("http://{addr}/"), None)).unwrap();
        let prober = Prober::new(Duration::from_secs(2)).unwrap();

        let results = Arc::new(AtomicU32::new(0));
        let errors = Arc::new(AtomicU32::new(0));
        let r = Arc::clone(&results);
        let e = Arc::clone(&errors);

        job.fire(
            &prober,
            move |_report| async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            move |entry, _err| {
                assert!(entry.url.starts_with("http://127.0.0.1"));
                async move {
                    e.fetch_add(1, Ordering::SeqCst);
                }
            },
        )
        .await;

        assert_eq!(results.load(Ordering::SeqCst), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fire_while_locked_is_a_noop() {
        let job = ExclusiveJob::from_entry(entry("http://example.com", None)).unwrap();
        let prober = Prober::new(Duration::from_secs(1)).unwrap();

        // Simulate an in-flight execution
        let gate = Arc::clone(&job.gate);
        let _held = gate.lock().await;

        let results = Arc::new(AtomicU32::new(0));
        let errors = Arc::new(AtomicU32::new(0));
        let r = Arc::clone(&results);
        let e = Arc::clone(&errors);

        job.fire(
            &prober,
            move |_report| async move {
                r.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            move |_entry, _err| async move {
                e.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;

        assert_eq!(results.load(Ordering::SeqCst), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_regex_fails_construction() {
        let result = ExclusiveJob::from_entry(entry("http://example.com", Some("[unclosed")));
        assert!(matches!(result, Err(SchedulerError::InvalidRegex { .. })));
    }
}
