//! Metrics collection.
//!
//! # Metrics
//! - `timeout_protection_requests_total` (counter): logical requests by `path` (direct, polled)
//! - `timeout_protection_polls_total` (counter): poll requests issued
//! - `timeout_protection_budget_expired_total` (counter): wait budgets that ran out
//! - `timeout_protection_outcomes_total` (counter): final outcomes by `outcome`
//!
//! # Design Decisions
//! - Uses the `metrics` facade; without an installed recorder these are no-ops

use metrics::counter;

/// Which way a logical request resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPath {
    Direct,
    Polled,
}

impl RequestPath {
    fn as_str(self) -> &'static str {
        match self {
            RequestPath::Direct => "direct",
            RequestPath::Polled => "polled",
        }
    }
}

pub fn record_request(path: RequestPath) {
    counter!("timeout_protection_requests_total", "path" => path.as_str()).increment(1);
}

pub fn record_poll() {
    counter!("timeout_protection_polls_total").increment(1);
}

pub fn record_budget_expired() {
    counter!("timeout_protection_budget_expired_total").increment(1);
}

pub fn record_outcome(outcome: &'static str) {
    counter!("timeout_protection_outcomes_total", "outcome" => outcome).increment(1);
}
