//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LVS API",
        version = "0.1.0",
        description = "License Verification Stack: multi-factor license verification, seat quotas, and verification audit logs."
    ),
    paths(
        crate::routes::licenses::verify_license,
        crate::routes::licenses::get_seats,
        crate::routes::licenses::reset_seats,
        crate::routes::licenses::list_logs,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::licenses::VerifyRequest,
        crate::routes::licenses::SeatStatus,
        crate::routes::licenses::SeatResetResponse,
        crate::routes::licenses::LogEntryView,
        lvs_engine::VerificationResponse,
        lvs_engine::ResponseDetails,
        lvs_engine::CheckView,
        lvs_engine::CheckName,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "licenses", description = "License verification and seat administration"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_license_paths() {
        let spec = ApiDoc::openapi();
        let paths: Vec<_> = spec.paths.paths.keys().cloned().collect();
        for expected in [
            "/v1/licenses/verify",
            "/v1/licenses/{key}/seats",
            "/v1/licenses/{key}/seats/reset",
            "/v1/licenses/{key}/logs",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }

    #[test]
    fn spec_declares_bearer_scheme() {
        let spec = ApiDoc::openapi();
        let components = spec.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
