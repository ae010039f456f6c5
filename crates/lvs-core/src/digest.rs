//! # Verification Token
//!
//! A short SHA-256 fingerprint binding a license key, the overall verdict,
//! and the evaluation date. It lets downstream consumers detect that a
//! cached verification result was edited or has gone stale.
//!
//! ## Not a Credential
//!
//! No secret is mixed into the digest. Anyone can recompute a token for any
//! `(key, verdict, date)` triple, so a token must never be accepted as
//! proof of authorization. Use it as an audit or cache-invalidation key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::identity::LicenseKey;

/// Number of hex characters kept from the SHA-256 digest (128 bits).
const TOKEN_HEX_LEN: usize = 32;

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Deterministic fingerprint of a verification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Compute the token for `(key, verdict, date)`.
    ///
    /// The digest input is `"{key}:{verdict}:{YYYY-MM-DD}"`.
    pub fn compute(key: &LicenseKey, verdict: bool, date: NaiveDate) -> Self {
        let input = format!("{}:{}:{}", key.as_str(), verdict, date.format("%Y-%m-%d"));
        let mut hex = sha256_hex(input.as_bytes());
        hex.truncate(TOKEN_HEX_LEN);
        Self(hex)
    }

    /// Access the token as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VerificationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
