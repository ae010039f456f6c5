//! # Prometheus Metrics
//!
//! Counters and histograms go through the `metrics` facade. `main` installs
//! a Prometheus recorder and stores its handle in [`AppState`], which the
//! `/metrics` handler renders. Without a recorder every update is a no-op.
//!
//! | Metric                               | Labels                   |
//! |--------------------------------------|--------------------------|
//! | `lvs_http_requests_total`            | `method`, `path`, `status` |
//! | `lvs_http_request_duration_seconds`  | `method`, `path`         |
//! | `lvs_verifications_total`            | `outcome`                |
//! | `lvs_seat_claims_total`              | `outcome`                |
//!
//! [`AppState`]: crate::state::AppState

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use lvs_engine::{CheckName, VerificationReport};

/// Record request count and latency, labelled by route template.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "lvs_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "lvs_http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(started.elapsed().as_secs_f64());

    response
}

/// Count one completed verification and, when claiming, its seat outcome.
pub fn record_verification(report: &VerificationReport, claim: bool) {
    let outcome = if !report.license_found {
        "not_found"
    } else if report.valid {
        "valid"
    } else {
        "invalid"
    };
    metrics::counter!("lvs_verifications_total", "outcome" => outcome).increment(1);

    if claim {
        if let Some(seats) = report.check(CheckName::Seats) {
            let outcome = if seats.passed { "claimed" } else { "refused" };
            metrics::counter!("lvs_seat_claims_total", "outcome" => outcome).increment(1);
        }
    }
}
