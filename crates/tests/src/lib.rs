//! # Integration Tests
//!
//! Cross-crate tests:
//! - wire-format snapshots for the queue payload
//! - mock end-to-end flows that need no broker or database

#[cfg(test)]
mod support {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `body` with status 200 for every connection until the test
    /// ends. Returns the base URL.
    pub async fn serve(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod wire_format_tests {
    use contracts::MetricsReport;

    /// The queue payload is a stable contract between the two processes;
    /// pin its exact shape.
    #[test]
    fn test_report_wire_shape() {
        let report = MetricsReport {
            url: "http://example.com".to_string(),
            response_time: 0.125,
            status_code: 502,
            regex_found: None,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "url": "http://example.com",
                "response_time": 0.125,
                "status_code": 502,
                "regex_found": null,
            })
        );
    }

    #[test]
    fn test_report_round_trips_through_the_wire() {
        let report = MetricsReport {
            url: "http://example.com/health".to_string(),
            response_time: 1.5,
            status_code: 200,
            regex_found: Some(true),
        };

        let payload = serde_json::to_vec(&report).unwrap();
        let decoded: MetricsReport = serde_json::from_slice(&payload).unwrap();
        assert_eq!(decoded, report);
    }
}

#[cfg(test)]
mod monitor_flow_tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use contracts::{ContractError, MetricSink, MetricsReport, ScheduleEntry};
    use scheduler::ProbeScheduler;

    use crate::support::serve;

    struct RecordingSink {
        reports: Arc<Mutex<Vec<MetricsReport>>>,
        shut_down: Arc<AtomicBool>,
    }

    impl MetricSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }
        async fn connect(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
        async fn start(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
        async fn deliver(&mut self, report: &MetricsReport) -> Result<(), ContractError> {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }
        async fn shutdown(&mut self) -> Result<(), ContractError> {
            self.shut_down.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Schedule a real HTTP probe every second and watch reports arrive
    /// at the sink, then shut down cleanly.
    #[tokio::test]
    async fn test_monitor_probes_and_publishes_on_schedule() {
        let url = serve("service OK").await;
        let reports = Arc::new(Mutex::new(Vec::new()));
        let shut_down = Arc::new(AtomicBool::new(false));

        let entries = vec![ScheduleEntry {
            url: url.clone(),
            schedule: "* * * * * *".to_string(),
            body_regex: Some("OK".to_string()),
        }];
        let sinks = vec![RecordingSink {
            reports: Arc::clone(&reports),
            shut_down: Arc::clone(&shut_down),
        }];

        let mut probe_scheduler = ProbeScheduler::new(entries, sinks, Duration::from_secs(5))
            .await
            .unwrap();
        probe_scheduler.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        probe_scheduler.shutdown().await.unwrap();

        let reports = reports.lock().unwrap();
        assert!(!reports.is_empty(), "no report arrived within 2.5s");
        let first = &reports[0];
        assert_eq!(first.url, url);
        assert_eq!(first.status_code, 200);
        assert_eq!(first.regex_found, Some(true));
        assert!(first.response_time >= 0.0);
        assert!(shut_down.load(Ordering::SeqCst), "sink was not shut down");
    }
}

#[cfg(test)]
mod storage_flow_tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use contracts::{ContractError, MetricSink, MetricsReport};
    use probe::{collect_metrics, Prober};
    use regex::Regex;

    use crate::support::serve;

    struct StoringSink {
        stored: Arc<Mutex<Vec<MetricsReport>>>,
    }

    impl MetricSink for StoringSink {
        fn name(&self) -> &str {
            "storing"
        }
        async fn connect(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
        async fn start(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
        async fn deliver(&mut self, report: &MetricsReport) -> Result<(), ContractError> {
            self.stored.lock().unwrap().push(report.clone());
            Ok(())
        }
        async fn shutdown(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    /// probe -> derive -> wire encode -> wire decode -> collector, the
    /// full data path minus the broker in the middle.
    #[tokio::test]
    async fn test_probe_report_survives_the_wire_into_a_collector() {
        let url = serve("status: healthy").await;

        let prober = Prober::new(Duration::from_secs(5)).unwrap();
        let result = prober.probe(&url).await.unwrap();
        let pattern = Regex::new("healthy").unwrap();
        let report = collect_metrics(&result, Some(&pattern)).unwrap();

        let payload = serde_json::to_vec(&report).unwrap();
        let decoded: MetricsReport = serde_json::from_slice(&payload).unwrap();

        let stored = Arc::new(Mutex::new(Vec::new()));
        let mut collectors = vec![StoringSink {
            stored: Arc::clone(&stored),
        }];
        dispatcher::dispatch(&decoded, &mut collectors).await.unwrap();

        let stored = stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], report);
        assert_eq!(stored[0].regex_found, Some(true));
    }
}

#[cfg(test)]
mod schedule_file_tests {
    use std::io::Write;

    /// A schedule file accepted by the loader must also pass the cron
    /// check the monitor performs at startup.
    #[test]
    fn test_loaded_schedule_passes_cron_validation() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"
[[jobs]]
url = "https://example.com"
schedule = "*/5 * * * * *"
body_regex = "OK"

[[jobs]]
url = "https://example.org/health"
schedule = "0 * * * * *"
"#
        )
        .unwrap();

        let schedule = config_loader::ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(schedule.jobs.len(), 2);
        for entry in &schedule.jobs {
            scheduler::validate_expression(&entry.schedule).unwrap();
        }
    }
}
