//! # Store Context
//!
//! Opens the license catalog and the SQLite database named by the global
//! flags. Every subcommand works against one [`Context`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Args;
use lvs_core::LicenseKey;
use lvs_state::{LicenseCatalog, LicenseRecord, LicenseRecordStore, MemoryRecordStore, SqliteStore};

/// Locations of the catalog and database. Flags override the environment.
#[derive(Args, Debug, Clone)]
pub struct StoreOpts {
    /// License catalog (YAML or JSON).
    #[arg(long, global = true, env = "LVS_CATALOG", default_value = "licenses.yaml")]
    pub catalog: PathBuf,

    /// SQLite database holding seat counters and the audit log.
    #[arg(long, global = true, env = "LVS_DB", default_value = "lvs.sqlite3")]
    pub db: PathBuf,
}

/// Opened stores.
#[derive(Debug, Clone)]
pub struct Context {
    pub records: Arc<MemoryRecordStore>,
    pub store: Arc<SqliteStore>,
}

impl Context {
    /// Load the catalog and open (or create) the database.
    pub fn open(opts: &StoreOpts) -> Result<Self> {
        let catalog = LicenseCatalog::load(&opts.catalog).with_context(|| {
            format!("failed to load license catalog: {}", opts.catalog.display())
        })?;
        let store = SqliteStore::open(&opts.db)
            .with_context(|| format!("failed to open database: {}", opts.db.display()))?;
        tracing::debug!(
            catalog = %opts.catalog.display(),
            db = %opts.db.display(),
            "stores opened"
        );
        Ok(Self {
            records: Arc::new(MemoryRecordStore::from_catalog(catalog)),
            store: Arc::new(store),
        })
    }

    /// The record for `key`, or an error naming the missing key.
    pub fn require_record(&self, key: &LicenseKey) -> Result<LicenseRecord> {
        self.records
            .get_record(key)?
            .with_context(|| format!("license {key} not found"))
    }
}
