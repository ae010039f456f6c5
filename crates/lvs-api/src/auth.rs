//! # Admin Authentication
//!
//! Seat resets and audit log reads require `Authorization: Bearer <token>`
//! matching `AUTH_TOKEN`. Verification and seat status are open.
//!
//! When no token is configured the admin routes are open as well; the
//! server logs a warning at startup in that case.

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time comparison of bearer tokens.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        // Keep timing independent of where the lengths diverge.
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Reject requests without the configured bearer token.
pub async fn require_admin(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) if constant_time_token_eq(token, &expected) => next.run(request).await,
            Some(_) => {
                tracing::warn!("admin authentication failed: invalid bearer token");
                AppError::Unauthorized("invalid bearer token".into()).into_response()
            }
            None => {
                tracing::warn!("admin authentication failed: non-Bearer authorization scheme");
                AppError::Unauthorized("authorization header must use Bearer scheme".into())
                    .into_response()
            }
        },
        None => {
            tracing::warn!("admin authentication failed: missing authorization header");
            AppError::Unauthorized("missing authorization header".into()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_app(token: Option<&str>) -> Router {
        Router::new()
            .route("/admin", get(|| async { "ok" }))
            .layer(from_fn(require_admin))
            .layer(axum::Extension(AuthConfig {
                token: token.map(str::to_string),
            }))
    }

    async fn status(app: Router, auth: Option<&str>) -> StatusCode {
        let mut req = Request::builder().uri("/admin");
        if let Some(value) = auth {
            req = req.header("authorization", value);
        }
        app.oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn valid_token_passes() {
        assert_eq!(status(test_app(Some("s3cret")), Some("Bearer s3cret")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_or_missing_token_rejected() {
        assert_eq!(
            status(test_app(Some("s3cret")), Some("Bearer nope")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(test_app(Some("s3cret")), Some("Basic s3cret")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status(test_app(Some("s3cret")), None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn no_configured_token_allows_all() {
        assert_eq!(status(test_app(None), None).await, StatusCode::OK);
    }

    #[test]
    fn token_comparison() {
        assert!(constant_time_token_eq("abc", "abc"));
        assert!(!constant_time_token_eq("abc", "abd"));
        assert!(!constant_time_token_eq("ab", "abc"));
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = AuthConfig {
            token: Some("s3cret".into()),
        };
        assert!(!format!("{cfg:?}").contains("s3cret"));
    }
}
