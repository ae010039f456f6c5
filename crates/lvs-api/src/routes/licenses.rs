//! # License Routes
//!
//! Routes:
//! - POST /v1/licenses/verify — Run a verification (optionally claiming a seat)
//! - GET  /v1/licenses/{key}/seats — Current seat usage
//! - POST /v1/licenses/{key}/seats/reset — Reset the seat counter (admin)
//! - GET  /v1/licenses/{key}/logs — Recent verifications (admin)
//!
//! A structurally successful verification always returns 200, including
//! for invalid or unknown licenses; the verdict is in the body.

use axum::extract::{Path, Query, State};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Json, Router};
use lvs_core::LicenseKey;
use lvs_engine::VerificationResponse;
use lvs_state::{LicenseRecord, VerificationLogEntry};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::require_admin;
use crate::error::AppError;
use crate::middleware::metrics::record_verification;
use crate::state::AppState;

/// Default number of log entries returned.
pub const DEFAULT_LOG_LIMIT: usize = 50;
/// Upper bound on log entries per request.
pub const MAX_LOG_LIMIT: usize = 500;

/// Request body for `POST /v1/licenses/verify`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// License key to verify.
    pub license_key: String,
    /// Claim a seat if one is free. The claim does not depend on the other
    /// checks, so an invalid license can still consume a seat.
    #[serde(default)]
    pub add_user: bool,
}

/// Seat usage for one license.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeatStatus {
    pub license_key: String,
    pub count: u32,
    pub seat_limit: u32,
}

/// Result of an administrative seat reset.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeatResetResponse {
    pub license_key: String,
    /// Count before the reset.
    pub previous_count: u32,
    pub count: u32,
}

/// Query parameters for the log endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LogQuery {
    /// Maximum entries to return (default 50, max 500).
    pub limit: Option<usize>,
}

/// One audit log entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogEntryView {
    pub id: String,
    pub license_key: String,
    pub valid: bool,
    /// Resolved country code, `unknown`, or absent when no lookup ran.
    pub country: Option<String>,
    pub device_ids: Vec<String>,
    pub message: String,
    pub verification_token: String,
    pub verified_at: String,
}

impl From<VerificationLogEntry> for LogEntryView {
    fn from(entry: VerificationLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            license_key: entry.license_key.to_string(),
            valid: entry.valid,
            country: entry.country.map(|c| c.to_string()),
            device_ids: entry.device_ids.into_iter().map(String::from).collect(),
            message: entry.message,
            verification_token: entry.token.to_string(),
            verified_at: entry.verified_at.to_iso8601(),
        }
    }
}

/// Build the license router.
pub fn router() -> Router<AppState> {
    let admin = Router::new()
        .route("/v1/licenses/{key}/seats/reset", post(reset_seats))
        .route("/v1/licenses/{key}/logs", get(list_logs))
        .route_layer(from_fn(require_admin));

    Router::new()
        .route("/v1/licenses/verify", post(verify_license))
        .route("/v1/licenses/{key}/seats", get(get_seats))
        .merge(admin)
}

/// Run a blocking store call off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, lvs_state::StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("store task failed: {e}")))?
        .map_err(AppError::from)
}

async fn find_record(state: &AppState, key: &LicenseKey) -> Result<LicenseRecord, AppError> {
    let records = state.records.clone();
    let lookup = key.clone();
    blocking(move || records.get_record(&lookup))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("license {key}")))
}

/// POST /v1/licenses/verify — Verify a license.
#[utoipa::path(
    post,
    path = "/v1/licenses/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification completed (see `valid`)", body = VerificationResponse),
        (status = 422, description = "Malformed license key", body = crate::error::ErrorBody),
        (status = 503, description = "License store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "licenses"
)]
pub async fn verify_license(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerificationResponse>, AppError> {
    let key = LicenseKey::new(&req.license_key)?;
    let report = state.verifier.verify(&key, req.add_user).await?;
    record_verification(&report, req.add_user);
    Ok(Json(report.to_response()))
}

/// GET /v1/licenses/{key}/seats — Current seat usage.
#[utoipa::path(
    get,
    path = "/v1/licenses/{key}/seats",
    params(("key" = String, Path, description = "License key")),
    responses(
        (status = 200, description = "Seat usage", body = SeatStatus),
        (status = 404, description = "Unknown license", body = crate::error::ErrorBody),
    ),
    tag = "licenses"
)]
pub async fn get_seats(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SeatStatus>, AppError> {
    let key = LicenseKey::new(&key)?;
    let record = find_record(&state, &key).await?;
    let seats = state.seats.clone();
    let lookup = key.clone();
    let count = blocking(move || seats.peek(&lookup)).await?;
    Ok(Json(SeatStatus {
        license_key: key.to_string(),
        count,
        seat_limit: record.seat_limit,
    }))
}

/// POST /v1/licenses/{key}/seats/reset — Reset the seat counter to zero.
#[utoipa::path(
    post,
    path = "/v1/licenses/{key}/seats/reset",
    params(("key" = String, Path, description = "License key")),
    responses(
        (status = 200, description = "Counter reset", body = SeatResetResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown license", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "licenses"
)]
pub async fn reset_seats(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SeatResetResponse>, AppError> {
    let key = LicenseKey::new(&key)?;
    find_record(&state, &key).await?;
    let seats = state.seats.clone();
    let target = key.clone();
    let previous_count = blocking(move || seats.reset(&target)).await?;
    tracing::info!(license_key = %key, previous_count, "seat counter reset");
    Ok(Json(SeatResetResponse {
        license_key: key.to_string(),
        previous_count,
        count: 0,
    }))
}

/// GET /v1/licenses/{key}/logs — Recent verifications, newest first.
#[utoipa::path(
    get,
    path = "/v1/licenses/{key}/logs",
    params(("key" = String, Path, description = "License key"), LogQuery),
    responses(
        (status = 200, description = "Log entries, newest first", body = Vec<LogEntryView>),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "licenses"
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<LogEntryView>>, AppError> {
    let key = LicenseKey::new(&key)?;
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT).min(MAX_LOG_LIMIT);
    let log = state.log.clone();
    let entries = blocking(move || log.entries_for(&key, limit)).await?;
    Ok(Json(entries.into_iter().map(LogEntryView::from).collect()))
}
