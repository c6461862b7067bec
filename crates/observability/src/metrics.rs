//! Metric descriptions for the counters emitted across the workspace.

use metrics::describe_counter;

/// Register help text for every metric the processes emit.
///
/// Call once after installing the recorder; emitting a metric before
/// its description is registered is harmless, the help text just
/// attaches late.
pub fn describe_metrics() {
    describe_counter!(
        "sitewatch_probes_total",
        "Completed URL probes, successful or not at the HTTP level"
    );
    describe_counter!(
        "sitewatch_probe_errors_total",
        "Probes that failed before a response could be measured"
    );
    describe_counter!(
        "sitewatch_triggers_skipped_total",
        "Cron triggers skipped because the previous run was still in flight"
    );
    describe_counter!(
        "sitewatch_messages_consumed_total",
        "Queue messages decoded and handed to the collectors"
    );
    describe_counter!(
        "sitewatch_messages_dropped_total",
        "Queue messages discarded because they could not be decoded"
    );
}
