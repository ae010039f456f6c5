//! Probe configuration.
//!
//! The geolocation endpoint and timeout come from the environment. Two
//! overrides replace live probing entirely, which is how offline hosts and
//! test rigs pin the observed environment:
//!
//! - `LVS_COUNTRY` fixes the resolved country and skips the network call.
//! - `LVS_DEVICE_IDS` (comma separated) replaces interface enumeration.

use std::collections::BTreeSet;
use std::time::Duration;

use lvs_core::{CountryCode, DeviceId};
use url::Url;

/// Default geolocation endpoint. Responds with `{"country": "US", ...}`.
pub const DEFAULT_GEO_URL: &str = "https://ipinfo.io/json";

/// Default geolocation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Accepted timeout range in seconds. A lookup must stay short.
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=30;

/// Configuration for the environment probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Geolocation endpoint.
    pub geo_url: Url,
    /// Geolocation request timeout in seconds.
    pub timeout_secs: u64,
    /// Static country override.
    pub country_override: Option<CountryCode>,
    /// Static device identifier override.
    pub device_override: Option<BTreeSet<DeviceId>>,
}

impl ProbeConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LVS_GEO_URL` (default: `https://ipinfo.io/json`)
    /// - `LVS_GEO_TIMEOUT_SECS` (default: 5, clamped to 1..=30)
    /// - `LVS_COUNTRY` (optional)
    /// - `LVS_DEVICE_IDS` (optional, comma separated)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url =
            non_empty(lookup("LVS_GEO_URL")).unwrap_or_else(|| DEFAULT_GEO_URL.to_string());
        let geo_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("LVS_GEO_URL".to_string(), e.to_string()))?;

        let timeout_secs = match non_empty(lookup("LVS_GEO_TIMEOUT_SECS")) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let country_override = non_empty(lookup("LVS_COUNTRY"))
            .map(|raw| CountryCode::new(&raw).map_err(|_| ConfigError::InvalidCountry(raw)))
            .transpose()?;

        let device_override = non_empty(lookup("LVS_DEVICE_IDS"))
            .map(|raw| parse_device_list(&raw))
            .transpose()?;

        Ok(Self {
            geo_url,
            timeout_secs,
            country_override,
            device_override,
        }
        .with_timeout_secs(timeout_secs))
    }

    /// Replace the timeout, clamped to [`TIMEOUT_RANGE_SECS`].
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.clamp(*TIMEOUT_RANGE_SECS.start(), *TIMEOUT_RANGE_SECS.end());
        self
    }

    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parse a comma-separated device identifier list. Blank items are skipped.
pub fn parse_device_list(raw: &str) -> Result<BTreeSet<DeviceId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| DeviceId::new(item).map_err(|_| ConfigError::InvalidDeviceId(item.to_string())))
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid LVS_GEO_TIMEOUT_SECS {0:?}: expected whole seconds")]
    InvalidTimeout(String),
    #[error("invalid LVS_COUNTRY {0:?}: expected a two-letter country code")]
    InvalidCountry(String),
    #[error("invalid device identifier {0:?} in LVS_DEVICE_IDS")]
    InvalidDeviceId(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ProbeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.geo_url.as_str(), "https://ipinfo.io/json");
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert!(cfg.country_override.is_none());
        assert!(cfg.device_override.is_none());
    }

    #[test]
    fn timeout_is_clamped() {
        let cfg = ProbeConfig::from_lookup(lookup(&[("LVS_GEO_TIMEOUT_SECS", "600")])).unwrap();
        assert_eq!(cfg.timeout_secs, 30);
        let cfg = ProbeConfig::from_lookup(lookup(&[("LVS_GEO_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(cfg.timeout_secs, 1);
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err =
            ProbeConfig::from_lookup(lookup(&[("LVS_GEO_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn rejects_invalid_url() {
        let err = ProbeConfig::from_lookup(lookup(&[("LVS_GEO_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(..)));
    }

    #[test]
    fn overrides_are_normalised() {
        let cfg = ProbeConfig::from_lookup(lookup(&[
            ("LVS_COUNTRY", "in"),
            ("LVS_DEVICE_IDS", "aa:bb:cc:dd:ee:ff, ,11:22:33:44:55:66"),
        ]))
        .unwrap();
        assert_eq!(cfg.country_override, Some(CountryCode::new("IN").unwrap()));
        let devices = cfg.device_override.unwrap();
        assert_eq!(devices.len(), 2);
        assert!(devices.contains(&DeviceId::new("AA:BB:CC:DD:EE:FF").unwrap()));
    }

    #[test]
    fn rejects_bad_country_override() {
        let err = ProbeConfig::from_lookup(lookup(&[("LVS_COUNTRY", "India")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCountry(_)));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = ProbeConfig::from_lookup(lookup(&[("LVS_COUNTRY", "  "), ("LVS_GEO_URL", "")]))
            .unwrap();
        assert!(cfg.country_override.is_none());
        assert_eq!(cfg.geo_url.as_str(), DEFAULT_GEO_URL);
    }
}
