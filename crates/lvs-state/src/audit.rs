//! # Verification Audit Log
//!
//! Append-only record of completed verifications, kept for license support
//! and for spotting abuse (e.g. one key verified from many countries).
//! Appending never influences a verification outcome.

use std::sync::Arc;

use lvs_core::{DeviceId, LicenseKey, ResolvedCountry, Timestamp, VerificationToken};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// One logged verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    /// Unique entry id.
    pub id: Uuid,
    /// License that was verified.
    pub license_key: LicenseKey,
    /// Overall verdict.
    pub valid: bool,
    /// Country observed during the evaluation; `None` when no lookup ran.
    pub country: Option<ResolvedCountry>,
    /// Local device identifiers observed during the evaluation.
    pub device_ids: Vec<DeviceId>,
    /// Summary message returned to the caller.
    pub message: String,
    /// Token returned to the caller.
    pub token: VerificationToken,
    /// When the verification completed.
    pub verified_at: Timestamp,
}

/// Append-only verification log.
pub trait VerificationLog: Send + Sync {
    /// Append an entry.
    fn append(&self, entry: &VerificationLogEntry) -> Result<(), StoreError>;

    /// Up to `limit` entries for `key`, newest first.
    fn entries_for(
        &self,
        key: &LicenseKey,
        limit: usize,
    ) -> Result<Vec<VerificationLogEntry>, StoreError>;
}

/// In-memory verification log.
#[derive(Debug, Clone, Default)]
pub struct MemoryVerificationLog {
    entries: Arc<Mutex<Vec<VerificationLogEntry>>>,
}

impl MemoryVerificationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all keys.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VerificationLog for MemoryVerificationLog {
    fn append(&self, entry: &VerificationLogEntry) -> Result<(), StoreError> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn entries_for(
        &self,
        key: &LicenseKey,
        limit: usize,
    ) -> Result<Vec<VerificationLogEntry>, StoreError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .rev()
            .filter(|e| &e.license_key == key)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(key: &str, valid: bool, message: &str) -> VerificationLogEntry {
        let license_key = LicenseKey::new(key).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        VerificationLogEntry {
            id: Uuid::new_v4(),
            token: VerificationToken::compute(&license_key, valid, date),
            license_key,
            valid,
            country: Some(ResolvedCountry::from_raw("US")),
            device_ids: vec![DeviceId::new("aa:bb:cc:dd:ee:ff").unwrap()],
            message: message.to_string(),
            verified_at: Timestamp::now(),
        }
    }

    #[test]
    fn entries_newest_first() {
        let log = MemoryVerificationLog::new();
        log.append(&entry("K", true, "first")).unwrap();
        log.append(&entry("K", false, "second")).unwrap();
        let entries = log.entries_for(&LicenseKey::new("K").unwrap(), 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[1].message, "first");
    }

    #[test]
    fn entries_filtered_by_key_and_limited() {
        let log = MemoryVerificationLog::new();
        for i in 0..5 {
            log.append(&entry("A", true, &format!("a{i}"))).unwrap();
        }
        log.append(&entry("B", true, "b0")).unwrap();
        let a = log.entries_for(&LicenseKey::new("A").unwrap(), 3).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a[0].message, "a4");
        assert_eq!(log.len(), 6);
    }
}
