//! # Verification Report
//!
//! [`VerificationReport`] is the engine's output. [`VerificationResponse`]
//! is its wire rendering, shared by the CLI and the HTTP API:
//!
//! ```json
//! {
//!   "valid": true,
//!   "message": "License verification successful",
//!   "details": {
//!     "license_key": "PREMIUM-123",
//!     "tier": "Premium",
//!     "features": ["All Features"],
//!     "checks": { "country": { "valid": true, "message": "..." }, ... },
//!     "warnings": [],
//!     "verification_token": "9f2c...",
//!     "verification_time": "2026-01-15T12:00:00Z"
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use lvs_core::{DeviceId, LicenseKey, ResolvedCountry, Timestamp, VerificationToken};
use serde::{Deserialize, Serialize};

/// Reason recorded when the key has no license record.
pub const NOT_FOUND_REASON: &str = "license key not found";

/// The four checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    Country,
    Device,
    Expiry,
    Seats,
}

impl CheckName {
    /// Every check in evaluation order.
    pub const ALL: [CheckName; 4] = [
        CheckName::Country,
        CheckName::Device,
        CheckName::Expiry,
        CheckName::Seats,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckName::Country => "country",
            CheckName::Device => "device",
            CheckName::Expiry => "expiry",
            CheckName::Seats => "seats",
        }
    }
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    pub reason: String,
    /// Set on a passing result whose reason must still be surfaced.
    #[serde(default)]
    pub warning: bool,
}

impl CheckResult {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
            warning: false,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: reason.into(),
            warning: false,
        }
    }

    /// A passing result flagged as a warning.
    pub fn notice(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
            warning: true,
        }
    }

    /// Whether the reason belongs in the report's warnings list.
    pub fn is_reportable(&self) -> bool {
        !self.passed || self.warning
    }
}

/// Aggregated result of one verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub license_key: LicenseKey,
    /// `false` when the key has no record and no check ran.
    pub license_found: bool,
    pub tier: Option<String>,
    pub features: Vec<String>,
    /// Per-check results. Empty when the license was not found.
    pub checks: BTreeMap<CheckName, CheckResult>,
    /// Logical AND of every check.
    pub valid: bool,
    /// Failure reasons plus expiry notices, in evaluation order.
    pub warnings: Vec<String>,
    pub token: VerificationToken,
    pub verified_at: Timestamp,
    /// Country seen by the geographic check.
    pub observed_country: Option<ResolvedCountry>,
    /// Identifiers seen by the device check.
    pub observed_device_ids: Vec<DeviceId>,
}

impl VerificationReport {
    /// Report for a key with no license record.
    pub fn not_found(key: LicenseKey, verified_at: Timestamp) -> Self {
        let token = VerificationToken::compute(&key, false, verified_at.date());
        Self {
            license_key: key,
            license_found: false,
            tier: None,
            features: Vec::new(),
            checks: BTreeMap::new(),
            valid: false,
            warnings: vec![NOT_FOUND_REASON.to_string()],
            token,
            verified_at,
            observed_country: None,
            observed_device_ids: Vec::new(),
        }
    }

    /// Result of one check, if it ran.
    pub fn check(&self, name: CheckName) -> Option<&CheckResult> {
        self.checks.get(&name)
    }

    /// One-line summary of the verdict.
    pub fn summary(&self) -> String {
        match (self.valid, self.warnings.is_empty()) {
            (true, true) => "License verification successful".to_string(),
            (true, false) => format!(
                "License verification successful with notices: {}",
                self.warnings.join("; ")
            ),
            (false, _) => format!("License verification failed: {}", self.warnings.join("; ")),
        }
    }

    /// Render the wire response.
    pub fn to_response(&self) -> VerificationResponse {
        VerificationResponse {
            valid: self.valid,
            message: self.summary(),
            details: ResponseDetails {
                license_key: self.license_key.to_string(),
                tier: self.tier.clone().unwrap_or_else(|| "Unknown".to_string()),
                features: self.features.clone(),
                checks: self
                    .checks
                    .iter()
                    .map(|(name, result)| {
                        (
                            *name,
                            CheckView {
                                valid: result.passed,
                                message: result.reason.clone(),
                            },
                        )
                    })
                    .collect(),
                warnings: self.warnings.clone(),
                verification_token: self.token.to_string(),
                verification_time: self.verified_at.to_iso8601(),
            },
        }
    }
}

/// Wire response for one verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VerificationResponse {
    /// Overall verdict.
    pub valid: bool,
    /// Summary message.
    pub message: String,
    pub details: ResponseDetails,
}

/// Detail block of a [`VerificationResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResponseDetails {
    pub license_key: String,
    pub tier: String,
    pub features: Vec<String>,
    /// Per-check results keyed by check name.
    pub checks: BTreeMap<CheckName, CheckView>,
    pub warnings: Vec<String>,
    /// Audit/cache fingerprint. Not an authorization credential.
    pub verification_token: String,
    /// ISO 8601 UTC.
    pub verification_time: String,
}

/// One check as rendered on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckView {
    pub valid: bool,
    pub message: String,
}
