//! # lvs-api — Axum API Service for the License Verification Stack
//!
//! ## API Surface
//!
//! | Route                                  | Auth   | Purpose                      |
//! |----------------------------------------|--------|------------------------------|
//! | `POST /v1/licenses/verify`             | none   | Verify, optionally claim     |
//! | `GET  /v1/licenses/{key}/seats`        | none   | Seat usage                   |
//! | `POST /v1/licenses/{key}/seats/reset`  | bearer | Reset seat counter           |
//! | `GET  /v1/licenses/{key}/logs`         | bearer | Recent verifications         |
//! | `GET  /health/liveness`, `/readiness`  | none   | Probes                       |
//! | `GET  /metrics`                        | none   | Prometheus exposition        |
//! | `GET  /openapi.json`                   | none   | OpenAPI document             |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → [admin routes: AuthMiddleware] → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::{AppConfig, AppState};

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use lvs_core::LicenseKey;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::licenses::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config));

    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(prometheus_metrics));

    Router::new().merge(ops).merge(api).with_state(state)
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the seat store answers a read.
async fn readiness(State(state): State<AppState>) -> Response {
    let seats = state.seats.clone();
    let probe = tokio::task::spawn_blocking(move || {
        let key = LicenseKey::new("readiness-probe").map_err(|e| e.to_string())?;
        seats.peek(&key).map_err(|e| e.to_string())
    })
    .await;
    match probe {
        Ok(Ok(_)) => "ready".into_response(),
        Ok(Err(reason)) => {
            tracing::warn!(%reason, "readiness probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe task failed");
            (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
        }
    }
}

/// GET /metrics — Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}
