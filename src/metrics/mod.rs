//! Prometheus metrics for the submission pipeline
//!
//! Exposes counters for:
//! - Quotes fetched
//! - Gas estimations by outcome
//! - Signatures by strategy and outcome
//! - Submissions by outcome

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_int_counter, CounterVec, Encoder, IntCounter, TextEncoder,
};

lazy_static! {
    pub static ref QUOTES_FETCHED: IntCounter = register_int_counter!(
        "swap_quotes_fetched_total",
        "Total quotes fetched from the aggregator"
    ).unwrap();

    pub static ref GAS_ESTIMATIONS: CounterVec = register_counter_vec!(
        "swap_gas_estimations_total",
        "Gas estimations by outcome",
        &["outcome"]
    ).unwrap();

    pub static ref SIGNATURES: CounterVec = register_counter_vec!(
        "swap_signatures_total",
        "Signing attempts by strategy and outcome",
        &["strategy", "outcome"]
    ).unwrap();

    pub static ref SUBMISSIONS: CounterVec = register_counter_vec!(
        "swap_submissions_total",
        "Submission pipeline runs by outcome",
        &["outcome"]
    ).unwrap();
}

/// Render every registered metric in the text exposition format
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "failure"
    }
}

// Helper functions to record metrics

pub fn record_quote() {
    QUOTES_FETCHED.inc();
}

pub fn record_gas_estimation(ok: bool) {
    GAS_ESTIMATIONS.with_label_values(&[outcome(ok)]).inc();
}

pub fn record_signature(strategy: &str, ok: bool) {
    SIGNATURES.with_label_values(&[strategy, outcome(ok)]).inc();
}

pub fn record_submission(label: &str) {
    SUBMISSIONS.with_label_values(&[label]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_counters() {
        record_quote();
        record_signature("standard", true);
        record_submission("skipped");

        let text = render();
        assert!(text.contains("swap_quotes_fetched_total"));
        assert!(QUOTES_FETCHED.get() >= 1);
        assert!(text.contains("swap_signatures_total"));
        assert!(text.contains("strategy=\"standard\""));
        assert!(text.contains("swap_submissions_total"));
    }
}
