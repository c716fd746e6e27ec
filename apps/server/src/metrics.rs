//! Prometheus metrics

use axum::{
    extract::{MatchedPath, Request},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Instant;

lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "roc_http_requests_total",
        "HTTP requests by method, route and status",
        &["method", "route", "status"]
    )
    .expect("metric can be registered");
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "roc_http_request_duration_seconds",
        "HTTP request latency by method and route",
        &["method", "route"]
    )
    .expect("metric can be registered");
    pub static ref PROFILE_UPDATES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "roc_profile_updates_total",
        "Profile update transactions by profile kind and outcome",
        &["kind", "outcome"]
    )
    .expect("metric can be registered");
}

/// Records request count and latency, labelled by the matched route
/// template so path parameters don't explode label cardinality.
pub async fn track_http_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(req).await;

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &route])
        .observe(start.elapsed().as_secs_f64());
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &route, response.status().as_str()])
        .inc();

    response
}

pub fn record_profile_update(kind: &str, outcome: &str) {
    PROFILE_UPDATES_TOTAL.with_label_values(&[kind, outcome]).inc();
}

/// `GET /metrics`
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_counter_increments() {
        let before = PROFILE_UPDATES_TOTAL
            .with_label_values(&["provider", "committed"])
            .get();
        record_profile_update("provider", "committed");
        let after = PROFILE_UPDATES_TOTAL
            .with_label_values(&["provider", "committed"])
            .get();
        assert_eq!(after, before + 1);
    }
}
