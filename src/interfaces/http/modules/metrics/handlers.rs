//! Prometheus scrape endpoint and domain counters

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::domain::{RequestKind, RequestStatus};

pub const REQUESTS_SUBMITTED: &str = "b2bsteel_requests_submitted_total";
pub const STATUS_TRANSITIONS: &str = "b2bsteel_status_transitions_total";
pub const SIGN_INS: &str = "b2bsteel_sign_ins_total";

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Register descriptions once the recorder is installed.
pub fn describe_metrics() {
    metrics::describe_counter!(REQUESTS_SUBMITTED, "Material requests stored, by kind");
    metrics::describe_counter!(STATUS_TRANSITIONS, "Admin status changes, by kind and target status");
    metrics::describe_counter!(SIGN_INS, "Sign-in attempts, by outcome");
    metrics::describe_counter!(super::middleware::HTTP_REQUESTS, "HTTP requests served");
    metrics::describe_histogram!(super::middleware::HTTP_DURATION, "HTTP request latency in seconds");
}

pub fn record_submission(kind: RequestKind) {
    metrics::counter!(REQUESTS_SUBMITTED, "kind" => kind.as_str()).increment(1);
}

pub fn record_transition(kind: RequestKind, status: RequestStatus) {
    metrics::counter!(STATUS_TRANSITIONS, "kind" => kind.as_str(), "status" => status.as_str())
        .increment(1);
}

pub fn record_sign_in(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(SIGN_INS, "outcome" => outcome).increment(1);
}

/// `GET /metrics` - Prometheus text format (no auth)
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
