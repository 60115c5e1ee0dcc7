//! Prometheus metrics for the synchronizer
//!
//! Counters for what came in, what was skipped and why, and what went out.

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

lazy_static! {
    /// Counter: inbound events by kind
    pub static ref EVENTS_RECEIVED: CounterVec = register_counter_vec!(
        "cardsync_events_received_total",
        "Inbound events received by kind",
        &["event"]
    )
    .expect("Failed to create events_received metric");

    /// Counter: events dropped by the rules, by kind and reason
    pub static ref EVENTS_SKIPPED: CounterVec = register_counter_vec!(
        "cardsync_events_skipped_total",
        "Inbound events skipped by kind and reason",
        &["event", "reason"]
    )
    .expect("Failed to create events_skipped metric");

    /// Counter: outbound actions emitted by kind
    pub static ref ACTIONS_EMITTED: CounterVec = register_counter_vec!(
        "cardsync_actions_emitted_total",
        "Outbound actions emitted by kind",
        &["action"]
    )
    .expect("Failed to create actions_emitted metric");

    /// Counter: outbound actions that completed with an error
    pub static ref ACTION_FAILURES: CounterVec = register_counter_vec!(
        "cardsync_action_failures_total",
        "Outbound actions that failed by kind",
        &["action"]
    )
    .expect("Failed to create action_failures metric");

    /// Histogram: time from emit to completion (seconds)
    pub static ref ACTION_DURATION: HistogramVec = register_histogram_vec!(
        "cardsync_action_duration_seconds",
        "Time from emitting an action to its completion",
        &["action"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to create action_duration metric");
}

/// Count an inbound event
pub fn record_event_received(event: &str) {
    EVENTS_RECEIVED.with_label_values(&[event]).inc();
}

/// Count a skipped event
pub fn record_event_skipped(event: &str, reason: &str) {
    EVENTS_SKIPPED.with_label_values(&[event, reason]).inc();
}

/// Count an emitted action
pub fn record_action_emitted(action: &str) {
    ACTIONS_EMITTED.with_label_values(&[action]).inc();
}

/// Count a failed action
pub fn record_action_failure(action: &str) {
    ACTION_FAILURES.with_label_values(&[action]).inc();
}

/// Record how long an action took to complete
pub fn record_action_duration(action: &str, duration_secs: f64) {
    ACTION_DURATION
        .with_label_values(&[action])
        .observe(duration_secs);
}

/// Encode all metrics as Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        record_event_received("trello.card.created");
        record_event_skipped("trello.card.created", "already_tracked");
        record_action_emitted("github.issue.create");
        record_action_failure("github.issue.create");
        record_action_duration("github.issue.create", 0.2);
    }

    #[test]
    fn test_encode_metrics() {
        record_action_emitted("jenkins.job.build");

        let output = encode_metrics();
        assert!(output.contains("cardsync_actions_emitted_total"));
        assert!(output.contains("jenkins.job.build"));
    }
}
