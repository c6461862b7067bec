//! ProbeScheduler - arms one cron trigger per schedule entry.

use std::sync::Arc;
use std::time::Duration;

use contracts::{ContractError, MetricSink, MetricsReport, ScheduleEntry};
use probe::Prober;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, instrument};

use crate::error::SchedulerError;
use crate::job::ExclusiveJob;

/// Bound on each loader sink's shutdown at scheduler shutdown
const SINK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Holds the fixed job set and the loader sinks of the producer process.
///
/// Construction validates every entry (cron expression, body regex); a
/// malformed entry fails startup. `start` arms all triggers and returns
/// without waiting for any execution.
pub struct ProbeScheduler<S: MetricSink + 'static> {
    scheduler: JobScheduler,
    sinks: Arc<Mutex<Vec<S>>>,
    job_count: usize,
}

impl<S: MetricSink + 'static> ProbeScheduler<S> {
    /// Build the scheduler from validated schedule entries and the sink set.
    pub async fn new(
        entries: Vec<ScheduleEntry>,
        sinks: Vec<S>,
        request_timeout: Duration,
    ) -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(SchedulerError::scheduler)?;
        let prober = Prober::new(request_timeout)?;
        let sinks = Arc::new(Mutex::new(sinks));
        let job_count = entries.len();

        for entry in entries {
            let job = Arc::new(ExclusiveJob::from_entry(entry)?);
            let cron = make_cron_job(job, prober.clone(), Arc::clone(&sinks))?;
            scheduler
                .add(cron)
                .await
                .map_err(SchedulerError::scheduler)?;
        }
        info!(jobs = job_count, "Schedule parsed");

        Ok(Self {
            scheduler,
            sinks,
            job_count,
        })
    }

    /// Number of armed jobs.
    pub fn job_count(&self) -> usize {
        self.job_count
    }

    /// Arm every job's recurring trigger. Call exactly once.
    #[instrument(name = "scheduler_start", skip(self))]
    pub async fn start(&self) -> Result<(), SchedulerError> {
        self.scheduler
            .start()
            .await
            .map_err(SchedulerError::scheduler)?;
        info!(jobs = self.job_count, "Jobs are scheduled");
        Ok(())
    }

    /// Fan one report out to the loader sinks.
    ///
    /// Used as the `on_result` path of every job; exposed for callers
    /// that produce reports outside the cron triggers.
    pub async fn publish(&self, report: &MetricsReport) -> Result<(), ContractError> {
        let mut sinks = self.sinks.lock().await;
        dispatcher::dispatch(report, sinks.as_mut_slice()).await
    }

    /// Disarm all triggers, then shut the loader sinks down concurrently.
    ///
    /// In-flight executions are not force-cancelled; each sink gets a
    /// bounded shutdown and a late sink is logged, not fatal.
    #[instrument(name = "scheduler_shutdown", skip(self))]
    pub async fn shutdown(&mut self) -> Result<(), SchedulerError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(SchedulerError::scheduler)?;
        let mut sinks = self.sinks.lock().await;
        dispatcher::shutdown_all(sinks.as_mut_slice(), SINK_SHUTDOWN_TIMEOUT).await;
        info!("Shutdown completed");
        Ok(())
    }
}

/// Check a cron expression with the same parser the runtime uses.
pub fn validate_expression(expr: &str) -> Result<(), SchedulerError> {
    Job::new_cron_job::<_, _, ()>(expr, |_uuid, _lock| {})
        .map(|_| ())
        .map_err(|e| SchedulerError::InvalidSchedule {
            expr: expr.to_string(),
            message: e.to_string(),
        })
}

fn make_cron_job<S: MetricSink + 'static>(
    job: Arc<ExclusiveJob>,
    prober: Prober,
    sinks: Arc<Mutex<Vec<S>>>,
) -> Result<Job, SchedulerError> {
    let expr = job.entry().schedule.clone();
    Job::new_cron_job_async(expr.as_str(), move |_uuid, _lock| {
        let job = Arc::clone(&job);
        let prober = prober.clone();
        let sinks = Arc::clone(&sinks);
        Box::pin(async move {
            let publish_sinks = Arc::clone(&sinks);
            job.fire(
                &prober,
                move |report| async move {
                    let mut guard = publish_sinks.lock().await;
                    dispatcher::dispatch(&report, guard.as_mut_slice()).await
                },
                |entry, err| {
                    let url = entry.url.clone();
                    async move {
                        error!(url = %url, error = %err, "Exception during health check job");
                    }
                },
            )
            .await;
        })
    })
    .map_err(|e| SchedulerError::InvalidSchedule {
        expr,
        message: e.to_string(),
    })
}
