//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers the verification engine compares.
//! Each constructor validates and normalises its input, so two values that
//! compare equal are equal for licensing purposes:
//!
//! - [`LicenseKey`]: trimmed, non-empty, at most 128 characters.
//! - [`CountryCode`]: two ASCII letters, upper-cased.
//! - [`DeviceId`]: trimmed and upper-cased, so matching is case-insensitive.
//!
//! All three deserialize through the validating constructor, so a catalog
//! file cannot smuggle in an unnormalised value.

use serde::{Deserialize, Serialize};

use crate::error::LvsError;

/// Maximum accepted license key length, in characters.
const MAX_KEY_LEN: usize = 128;

// ─── License Key ─────────────────────────────────────────────────────

/// Opaque unique identifier of a license.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Create a validated license key. Surrounding whitespace is trimmed.
    pub fn new(s: impl AsRef<str>) -> Result<Self, LvsError> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LvsError::identifier("license key", "must not be empty"));
        }
        if trimmed.chars().count() > MAX_KEY_LEN {
            return Err(LvsError::identifier(
                "license key",
                format!("must not exceed {MAX_KEY_LEN} characters"),
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(LvsError::identifier(
                "license key",
                "must not contain control characters",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LicenseKey {
    type Error = LvsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LicenseKey> for String {
    fn from(key: LicenseKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for LicenseKey {
    type Err = LvsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ─── Country Code ────────────────────────────────────────────────────

/// ISO 3166-1 alpha-2 country code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Create a validated country code. Lower-case input is accepted and
    /// normalised.
    pub fn new(s: impl AsRef<str>) -> Result<Self, LvsError> {
        let trimmed = s.as_ref().trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LvsError::identifier(
                "country code",
                format!("expected two ASCII letters, got {trimmed:?}"),
            ));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Access the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = LvsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// Outcome of a geolocation lookup.
///
/// A failed or timed-out lookup is `Unknown`. It is a normal value that the
/// geographic check evaluates as not permitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedCountry {
    /// The lookup produced a well-formed country code.
    Known(CountryCode),
    /// The lookup failed, timed out, or returned garbage.
    Unknown,
}

impl ResolvedCountry {
    /// Build from a raw code, mapping anything malformed to `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        CountryCode::new(raw).map_or(Self::Unknown, Self::Known)
    }

    /// The resolved code, if any.
    pub fn code(&self) -> Option<&CountryCode> {
        match self {
            Self::Known(code) => Some(code),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for ResolvedCountry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(code) => f.write_str(code.as_str()),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

// ─── Device Identifier ───────────────────────────────────────────────

/// Hardware identifier of a machine (typically a MAC address).
///
/// Stored upper-cased: `aa:bb:cc:dd:ee:ff` and `AA:BB:CC:DD:EE:FF` are the
/// same device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a normalised device identifier.
    pub fn new(s: impl AsRef<str>) -> Result<Self, LvsError> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LvsError::identifier("device id", "must not be empty"));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Access the normalised identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = LvsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}
