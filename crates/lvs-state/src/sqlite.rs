//! SQLite backend for seat counters and the verification log.
//!
//! One database file holds both tables. WAL mode lets readers proceed
//! while a claim is in flight. Every write runs in a `BEGIN IMMEDIATE`
//! transaction, which takes the database write lock up front, so claims
//! are serialised across threads and across processes sharing the file.
//! `busy_timeout` makes a contending writer wait for the lock instead of
//! failing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lvs_core::{DeviceId, LicenseKey, ResolvedCountry, Timestamp};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use crate::audit::{VerificationLog, VerificationLogEntry};
use crate::error::StoreError;
use crate::seats::{SeatClaim, SeatCounterStore};

/// How long a writer waits for a competing transaction before erroring.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

const CREATE_TABLES_SQL: &str = "
    CREATE TABLE IF NOT EXISTS seat_counters (
        license_key TEXT PRIMARY KEY,
        count       INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
        updated_at  TEXT    NOT NULL
    ) WITHOUT ROWID;

    CREATE TABLE IF NOT EXISTS verification_log (
        seq         INTEGER PRIMARY KEY AUTOINCREMENT,
        id          TEXT    NOT NULL UNIQUE,
        license_key TEXT    NOT NULL,
        valid       INTEGER NOT NULL,
        country     TEXT,
        device_ids  TEXT    NOT NULL,
        message     TEXT    NOT NULL,
        token       TEXT    NOT NULL,
        verified_at TEXT    NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_verification_log_key
        ON verification_log (license_key, seq);
";

/// SQLite-backed [`SeatCounterStore`] and [`VerificationLog`].
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        let store = Self::init(conn, Some(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(CREATE_TABLES_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl SeatCounterStore for SqliteStore {
    fn peek(&self, key: &LicenseKey) -> Result<u32, StoreError> {
        let conn = self.conn.lock();
        let count: Option<u32> = conn
            .query_row(
                "SELECT count FROM seat_counters WHERE license_key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    fn try_claim(&self, key: &LicenseKey, limit: u32) -> Result<SeatClaim, StoreError> {
        let now = Timestamp::now().to_iso8601();
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT OR IGNORE INTO seat_counters (license_key, count, updated_at)
             VALUES (?1, 0, ?2)",
            params![key.as_str(), now],
        )?;
        let changed = tx.execute(
            "UPDATE seat_counters SET count = count + 1, updated_at = ?3
             WHERE license_key = ?1 AND count < ?2",
            params![key.as_str(), limit, now],
        )?;
        let count: u32 = tx.query_row(
            "SELECT count FROM seat_counters WHERE license_key = ?1",
            params![key.as_str()],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(SeatClaim {
            succeeded: changed == 1,
            count,
        })
    }

    fn reset(&self, key: &LicenseKey) -> Result<u32, StoreError> {
        let now = Timestamp::now().to_iso8601();
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let previous: Option<u32> = tx
            .query_row(
                "SELECT count FROM seat_counters WHERE license_key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        tx.execute(
            "UPDATE seat_counters SET count = 0, updated_at = ?2 WHERE license_key = ?1",
            params![key.as_str(), now],
        )?;
        tx.commit()?;
        Ok(previous.unwrap_or(0))
    }
}

/// Raw column values of one `verification_log` row.
type LogRow = (String, String, bool, Option<String>, String, String, String, String);

impl VerificationLog for SqliteStore {
    fn append(&self, entry: &VerificationLogEntry) -> Result<(), StoreError> {
        let device_ids = serde_json::to_string(&entry.device_ids)
            .map_err(|e| StoreError::Corrupt(format!("device ids: {e}")))?;
        let country = entry.country.as_ref().map(ToString::to_string);
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO verification_log
             (id, license_key, valid, country, device_ids, message, token, verified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.id.to_string(),
                entry.license_key.as_str(),
                entry.valid,
                country,
                device_ids,
                entry.message,
                entry.token.as_str(),
                entry.verified_at.to_iso8601(),
            ],
        )?;
        Ok(())
    }

    fn entries_for(
        &self,
        key: &LicenseKey,
        limit: usize,
    ) -> Result<Vec<VerificationLogEntry>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<LogRow> = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(
                "SELECT id, license_key, valid, country, device_ids, message, token, verified_at
                 FROM verification_log
                 WHERE license_key = ?1
                 ORDER BY seq DESC
                 LIMIT ?2",
            )?;
            let mapped = stmt.query_map(params![key.as_str(), limit], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                ))
            })?;
            mapped.collect::<Result<_, _>>()?
        };
        rows.into_iter().map(decode_log_row).collect()
    }
}

fn decode_log_row(row: LogRow) -> Result<VerificationLogEntry, StoreError> {
    let (id, key, valid, country, device_ids, message, token, verified_at) = row;
    let id = Uuid::parse_str(&id).map_err(|e| StoreError::Corrupt(format!("entry id: {e}")))?;
    let license_key =
        LicenseKey::new(&key).map_err(|e| StoreError::Corrupt(format!("license key: {e}")))?;
    let device_ids: Vec<DeviceId> = serde_json::from_str(&device_ids)
        .map_err(|e| StoreError::Corrupt(format!("device ids: {e}")))?;
    let token = serde_json::from_value(serde_json::Value::String(token))
        .map_err(|e| StoreError::Corrupt(format!("token: {e}")))?;
    let verified_at = Timestamp::parse(&verified_at)
        .map_err(|e| StoreError::Corrupt(format!("verified_at: {e}")))?;
    Ok(VerificationLogEntry {
        id,
        license_key,
        valid,
        country: country.as_deref().map(ResolvedCountry::from_raw),
        device_ids,
        message,
        token,
        verified_at,
    })
}
