//! # Bootstrap
//!
//! Builds [`AppState`] from configuration: loads the license catalog,
//! opens the SQLite store, and selects the environment probes.

use std::sync::Arc;

use lvs_engine::Verifier;
use lvs_probe::{device_adapter, geolocation_adapter, ProbeConfig, ProbeError};
use lvs_state::{LicenseCatalog, MemoryRecordStore, SqliteStore, StoreError};

use crate::state::{AppConfig, AppState};

/// Errors that prevent the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to load license catalog: {0}")]
    Catalog(#[source] StoreError),
    #[error("failed to open database: {0}")]
    Database(#[source] StoreError),
    #[error("failed to configure probes: {0}")]
    Probe(#[from] ProbeError),
}

/// Build the application state.
pub fn bootstrap(config: AppConfig, probe: &ProbeConfig) -> Result<AppState, BootstrapError> {
    let catalog = LicenseCatalog::load(&config.catalog_path).map_err(BootstrapError::Catalog)?;
    let records = Arc::new(MemoryRecordStore::from_catalog(catalog));
    let store = Arc::new(SqliteStore::open(&config.db_path).map_err(BootstrapError::Database)?);

    let verifier = Verifier::new(
        records.clone(),
        store.clone(),
        geolocation_adapter(probe)?,
        device_adapter(probe),
    )
    .with_log(store.clone());

    tracing::info!(
        licenses = records.len(),
        catalog = %config.catalog_path.display(),
        db = %config.db_path.display(),
        "license verification service bootstrapped"
    );
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set: admin routes are unauthenticated");
    }

    Ok(AppState::new(config, verifier, records, store.clone(), store))
}
