//! # License Records and Catalog
//!
//! A [`LicenseRecord`] is the declarative constraint set for one license
//! key. The engine only ever reads records; they are provisioned by loading
//! a catalog document:
//!
//! ```yaml
//! licenses:
//!   - key: PREMIUM-123
//!     allowed_countries: [US, IN, MY, GB, CA]
//!     allowed_device_ids: ["00:1A:2B:3C:4D:5E"]
//!     expiry: "2027-12-31"
//!     seat_limit: 50
//!     tier: Premium
//!     features: [All Features, Priority Support]
//! ```
//!
//! The expiry is kept as the raw string and malformed country codes are
//! set aside in `invalid_countries`. Either is a defect of that one license
//! and surfaces as a failed check, so it must not stop the rest of the
//! catalog from loading.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use lvs_core::{parse_calendar_date, CountryCode, DeviceId, LicenseKey};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

// ─── Record ──────────────────────────────────────────────────────────

/// Constraints attached to one license key.
///
/// Deserializes through [`RawLicenseRecord`] so a bad country entry is
/// kept aside in `invalid_countries` instead of failing the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLicenseRecord")]
pub struct LicenseRecord {
    /// Unique license key.
    pub key: LicenseKey,
    /// Countries the license may be used in. Empty means none.
    pub allowed_countries: BTreeSet<CountryCode>,
    /// Configured country entries that are not valid codes. Any entry here
    /// fails the country check.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_countries: Vec<String>,
    /// Machines the license may run on. Empty means none.
    pub allowed_device_ids: BTreeSet<DeviceId>,
    /// Inclusive last valid day, `YYYY-MM-DD`.
    pub expiry: String,
    /// Maximum number of concurrently claimed seats.
    pub seat_limit: u32,
    /// Descriptive tier name. Not evaluated.
    pub tier: String,
    /// Descriptive feature list. Not evaluated.
    pub features: Vec<String>,
}

/// Catalog form of a record, with countries as unvalidated strings.
#[derive(Debug, Deserialize)]
struct RawLicenseRecord {
    key: LicenseKey,
    #[serde(default)]
    allowed_countries: Vec<String>,
    #[serde(default)]
    invalid_countries: Vec<String>,
    #[serde(default)]
    allowed_device_ids: BTreeSet<DeviceId>,
    expiry: String,
    seat_limit: u32,
    #[serde(default = "default_tier")]
    tier: String,
    #[serde(default)]
    features: Vec<String>,
}

impl From<RawLicenseRecord> for LicenseRecord {
    fn from(raw: RawLicenseRecord) -> Self {
        let mut allowed_countries = BTreeSet::new();
        let mut invalid_countries = raw.invalid_countries;
        for entry in raw.allowed_countries {
            match CountryCode::new(&entry) {
                Ok(code) => {
                    allowed_countries.insert(code);
                }
                Err(_) => invalid_countries.push(entry),
            }
        }
        Self {
            key: raw.key,
            allowed_countries,
            invalid_countries,
            allowed_device_ids: raw.allowed_device_ids,
            expiry: raw.expiry,
            seat_limit: raw.seat_limit,
            tier: raw.tier,
            features: raw.features,
        }
    }
}

fn default_tier() -> String {
    "Unknown".to_string()
}

// ─── Store Trait ─────────────────────────────────────────────────────

/// Read access to license records.
pub trait LicenseRecordStore: Send + Sync {
    /// Look up the record for `key`. `Ok(None)` means the key is not
    /// provisioned; `Err` means the store itself could not be read.
    fn get_record(&self, key: &LicenseKey) -> Result<Option<LicenseRecord>, StoreError>;
}

/// Thread-safe, cloneable in-memory record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<HashMap<LicenseKey, LicenseRecord>>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding every record of a catalog.
    pub fn from_catalog(catalog: LicenseCatalog) -> Self {
        let store = Self::new();
        for record in catalog.licenses {
            store.insert(record);
        }
        store
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&self, record: LicenseRecord) -> Option<LicenseRecord> {
        self.records.write().insert(record.key.clone(), record)
    }

    /// Number of provisioned licenses.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LicenseRecordStore for MemoryRecordStore {
    fn get_record(&self, key: &LicenseKey) -> Result<Option<LicenseRecord>, StoreError> {
        Ok(self.records.read().get(key).cloned())
    }
}

// ─── Catalog ─────────────────────────────────────────────────────────

/// A parsed and validated license catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseCatalog {
    /// All provisioned licenses.
    #[serde(default)]
    pub licenses: Vec<LicenseRecord>,
}

impl LicenseCatalog {
    /// Load a catalog from disk. Files ending in `.json` are parsed as
    /// JSON; everything else as YAML.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json(&raw)
        } else {
            Self::from_yaml(&raw)
        }
        .map_err(|reason| StoreError::CatalogParse {
            path: path.to_path_buf(),
            reason,
        })?;
        catalog.validate()?;
        tracing::info!(
            path = %path.display(),
            licenses = catalog.licenses.len(),
            "loaded license catalog"
        );
        Ok(catalog)
    }

    /// Parse a YAML catalog document without validating it.
    pub fn from_yaml(raw: &str) -> Result<Self, String> {
        serde_yaml::from_str(raw).map_err(|e| e.to_string())
    }

    /// Parse a JSON catalog document without validating it.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }

    /// Check structural rules: unique keys and positive seat limits.
    ///
    /// Malformed expiry dates and country codes are logged, not rejected.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut seen = BTreeSet::new();
        for record in &self.licenses {
            if !seen.insert(&record.key) {
                return Err(StoreError::InvalidCatalog(format!(
                    "duplicate license key {}",
                    record.key
                )));
            }
            if record.seat_limit == 0 {
                return Err(StoreError::InvalidCatalog(format!(
                    "license {} has a seat limit of 0",
                    record.key
                )));
            }
            if !record.invalid_countries.is_empty() {
                tracing::warn!(
                    license_key = %record.key,
                    countries = ?record.invalid_countries,
                    "catalog entry has malformed country codes"
                );
            }
            if parse_calendar_date(&record.expiry).is_err() {
                tracing::warn!(
                    license_key = %record.key,
                    expiry = %record.expiry,
                    "catalog entry has a malformed expiry date"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
licenses:
  - key: PREMIUM-123
    allowed_countries: [us, IN]
    allowed_device_ids: ["aa:bb:cc:dd:ee:ff"]
    expiry: "2027-12-31"
    seat_limit: 50
    tier: Premium
    features: [All Features]
  - key: BARE-1
    expiry: "2027-01-01"
    seat_limit: 1
"#;

    fn key(s: &str) -> LicenseKey {
        LicenseKey::new(s).unwrap()
    }

    #[test]
    fn parse_yaml_normalises_identifiers() {
        let catalog = LicenseCatalog::from_yaml(SAMPLE).unwrap();
        catalog.validate().unwrap();
        let premium = &catalog.licenses[0];
        assert!(premium.allowed_countries.contains(&CountryCode::new("US").unwrap()));
        assert!(premium
            .allowed_device_ids
            .contains(&DeviceId::new("AA:BB:CC:DD:EE:FF").unwrap()));
        assert_eq!(premium.tier, "Premium");
    }

    #[test]
    fn omitted_fields_default() {
        let catalog = LicenseCatalog::from_yaml(SAMPLE).unwrap();
        let bare = &catalog.licenses[1];
        assert!(bare.allowed_countries.is_empty());
        assert!(bare.allowed_device_ids.is_empty());
        assert_eq!(bare.tier, "Unknown");
        assert!(bare.features.is_empty());
    }

    #[test]
    fn malformed_country_is_confined_to_its_record() {
        let raw = r#"
licenses:
  - key: GOOD-1
    allowed_countries: [US]
    expiry: "2027-01-01"
    seat_limit: 1
  - key: BAD-2
    allowed_countries: [USA, in]
    expiry: "2027-01-01"
    seat_limit: 1
"#;
        let catalog = LicenseCatalog::from_yaml(raw).unwrap();
        catalog.validate().unwrap();
        let store = MemoryRecordStore::from_catalog(catalog);

        let good = store.get_record(&key("GOOD-1")).unwrap().unwrap();
        assert!(good.allowed_countries.contains(&CountryCode::new("US").unwrap()));
        assert!(good.invalid_countries.is_empty());

        let bad = store.get_record(&key("BAD-2")).unwrap().unwrap();
        assert_eq!(bad.invalid_countries, vec!["USA".to_string()]);
        assert!(bad.allowed_countries.contains(&CountryCode::new("IN").unwrap()));
    }

    #[test]
    fn invalid_countries_survive_json_roundtrip() {
        let raw = r#"{"licenses":[{"key":"K","allowed_countries":["USA"],"expiry":"2027-01-01","seat_limit":1}]}"#;
        let catalog = LicenseCatalog::from_json(raw).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let again = LicenseCatalog::from_json(&json).unwrap();
        assert_eq!(again.licenses, catalog.licenses);
        assert_eq!(again.licenses[0].invalid_countries, vec!["USA".to_string()]);
    }

    #[test]
    fn duplicate_keys_rejected() {
        let raw = r#"{"licenses":[
            {"key":"K","expiry":"2027-01-01","seat_limit":1},
            {"key":"K","expiry":"2027-01-01","seat_limit":2}
        ]}"#;
        let catalog = LicenseCatalog::from_json(raw).unwrap();
        assert!(matches!(
            catalog.validate(),
            Err(StoreError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn zero_seat_limit_rejected() {
        let raw = r#"{"licenses":[{"key":"K","expiry":"2027-01-01","seat_limit":0}]}"#;
        let catalog = LicenseCatalog::from_json(raw).unwrap();
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn malformed_expiry_still_loads() {
        let raw = r#"{"licenses":[{"key":"K","expiry":"31/12/2027","seat_limit":1}]}"#;
        let catalog = LicenseCatalog::from_json(raw).unwrap();
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn memory_store_lookup() {
        let catalog = LicenseCatalog::from_yaml(SAMPLE).unwrap();
        let store = MemoryRecordStore::from_catalog(catalog);
        assert_eq!(store.len(), 2);
        let record = store.get_record(&key("PREMIUM-123")).unwrap().unwrap();
        assert_eq!(record.seat_limit, 50);
        assert!(store.get_record(&key("MISSING")).unwrap().is_none());
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryRecordStore::new();
        let clone = store.clone();
        clone.insert(LicenseRecord {
            key: key("K"),
            allowed_countries: BTreeSet::new(),
            invalid_countries: Vec::new(),
            allowed_device_ids: BTreeSet::new(),
            expiry: "2027-01-01".to_string(),
            seat_limit: 1,
            tier: default_tier(),
            features: Vec::new(),
        });
        assert!(store.get_record(&key("K")).unwrap().is_some());
    }
}
