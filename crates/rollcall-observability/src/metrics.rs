//! Prometheus metrics.
//!
//! HTTP metrics come from [`metrics_middleware`]; domain counters are
//! recorded by the services through the `track_*` helpers. All of them are
//! no-ops while observability is disabled.

use std::time::{Duration, Instant};

use anyhow::Context;
use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::logging::is_observability_enabled;

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `None` when observability is disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )
        .context("invalid histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);
    let response = next.run(req).await;
    gauge!("http_requests_active").decrement(1.0);

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(start.elapsed().as_secs_f64());

    response
}

/// `GET /metrics` in Prometheus text format.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// `mode` is `single` or `bulk`.
pub fn track_registration_numbers_generated(mode: &'static str, count: u64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("registration_numbers_generated_total", "mode" => mode).increment(count);
}

pub fn track_registration_number_consumed() {
    if !is_observability_enabled() {
        return;
    }
    counter!("registration_numbers_consumed_total").increment(1);
}

/// `reason` is `rejected` or `deleted`.
pub fn track_registration_number_released(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("registration_numbers_released_total", "reason" => reason).increment(1);
}

pub fn track_schedule_conflict() {
    if !is_observability_enabled() {
        return;
    }
    counter!("schedule_conflicts_total").increment(1);
}

pub fn track_sessions_expanded(view: &'static str, count: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sessions_expanded_total", "view" => view).increment(count as u64);
}

pub fn track_attendance_saved(count: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("attendance_rows_saved_total").increment(count as u64);
}
