//! Rollcall observability.
//!
//! - Structured logging with console, rolling file and JSON outputs
//! - Distributed tracing exported over OTLP
//! - Prometheus metrics, including counters for registration numbers,
//!   schedule conflicts, expanded sessions and saved attendance
//!
//! Compiled in with the `observability` feature (default) and switched off
//! at runtime with `OBSERVABILITY_ENABLED=false`. Either way a plain console
//! logger stays active.
//!
//! ```no_run
//! use rollcall_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     // ... application code ...
//!     shutdown_tracer().await;
//!     Ok(())
//! }
//! ```

pub mod basic_logging;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, track_attendance_saved,
    track_registration_number_consumed, track_registration_number_released,
    track_registration_numbers_generated, track_schedule_conflict, track_sessions_expanded,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Console logging only.
    pub fn init_tracing() -> anyhow::Result<()> {
        super::init_basic_console_logging();
        Ok(())
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> anyhow::Result<Option<()>> {
        Ok(None)
    }

    pub fn metrics_app(_handle: ()) -> Router {
        Router::new()
    }

    pub fn track_registration_numbers_generated(_mode: &'static str, _count: u64) {}
    pub fn track_registration_number_consumed() {}
    pub fn track_registration_number_released(_reason: &'static str) {}
    pub fn track_schedule_conflict() {}
    pub fn track_sessions_expanded(_view: &'static str, _count: usize) {}
    pub fn track_attendance_saved(_count: usize) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
