//! # lvs-probe -- Environment probes
//!
//! The two I/O adapters the verification engine consults:
//!
//! - **Geolocation** ([`GeolocationAdapter`]): one bounded HTTP call to an
//!   ipinfo-compatible endpoint. Failures resolve to an unknown country.
//! - **Device identity** ([`DeviceIdentityAdapter`]): MAC addresses of the
//!   local network interfaces.
//!
//! Both have static stand-ins ([`FixedCountry`], [`StaticDevices`]) used
//! when `LVS_COUNTRY` / `LVS_DEVICE_IDS` are set and in tests.

pub mod config;
pub mod device;
pub mod error;
pub mod geo;

pub use config::{ConfigError, ProbeConfig};
pub use device::{DeviceIdentityAdapter, StaticDevices, SystemDevices};
pub use error::ProbeError;
pub use geo::{CountryFuture, FixedCountry, GeolocationAdapter, IpInfoLocator};

use std::sync::Arc;

/// Build the geolocation adapter selected by `config`.
pub fn geolocation_adapter(
    config: &ProbeConfig,
) -> Result<Arc<dyn GeolocationAdapter>, ProbeError> {
    match &config.country_override {
        Some(code) => {
            tracing::info!(country = %code, "using static country override");
            Ok(Arc::new(FixedCountry::known(code.clone())))
        }
        None => Ok(Arc::new(IpInfoLocator::new(
            config.geo_url.clone(),
            config.timeout(),
        )?)),
    }
}

/// Build the device identity adapter selected by `config`.
pub fn device_adapter(config: &ProbeConfig) -> Arc<dyn DeviceIdentityAdapter> {
    match &config.device_override {
        Some(ids) => {
            tracing::info!(count = ids.len(), "using static device identifier override");
            Arc::new(StaticDevices(ids.clone()))
        }
        None => Arc::new(SystemDevices::new()),
    }
}
