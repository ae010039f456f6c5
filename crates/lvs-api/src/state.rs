//! # Application State
//!
//! Shared state handed to every route handler: the verifier plus direct
//! handles on the stores for the seat and audit endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use lvs_engine::Verifier;
use lvs_state::{LicenseRecordStore, SeatCounterStore, VerificationLog};
use metrics_exporter_prometheus::PrometheusHandle;

/// Service configuration.
///
/// Custom `Debug` redacts the auth token.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Bearer token guarding admin routes. `None` disables the check.
    pub auth_token: Option<String>,
    /// License catalog file.
    pub catalog_path: PathBuf,
    /// SQLite database for seat counters and the audit log.
    pub db_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("catalog_path", &self.catalog_path)
            .field("db_path", &self.db_path)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            catalog_path: PathBuf::from("licenses.yaml"),
            db_path: PathBuf::from("lvs.sqlite3"),
        }
    }
}

impl AppConfig {
    /// Load from `PORT`, `AUTH_TOKEN`, `LVS_CATALOG` and `LVS_DB`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            auth_token: std::env::var("AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
            catalog_path: std::env::var_os("LVS_CATALOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            db_path: std::env::var_os("LVS_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub verifier: Verifier,
    pub records: Arc<dyn LicenseRecordStore>,
    pub seats: Arc<dyn SeatCounterStore>,
    pub log: Arc<dyn VerificationLog>,
    /// Renders `/metrics`. `None` when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("verifier", &self.verifier)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Assemble state from already-built components.
    pub fn new(
        config: AppConfig,
        verifier: Verifier,
        records: Arc<dyn LicenseRecordStore>,
        seats: Arc<dyn SeatCounterStore>,
        log: Arc<dyn VerificationLog>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
            records,
            seats,
            log,
            metrics: None,
        }
    }

    /// Serve `/metrics` from `handle`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
