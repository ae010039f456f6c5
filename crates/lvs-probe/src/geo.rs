//! Geolocation adapter: resolve the caller's current country.
//!
//! A lookup never fails from the caller's point of view. Transport errors,
//! timeouts, bad statuses and malformed bodies all resolve to
//! [`ResolvedCountry::Unknown`], logged at warn level. There is no retry.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use lvs_core::{CountryCode, ResolvedCountry};
use serde::Deserialize;
use url::Url;

use crate::error::ProbeError;

/// Boxed future returned by [`GeolocationAdapter::lookup_country`].
pub type CountryFuture<'a> = Pin<Box<dyn Future<Output = ResolvedCountry> + Send + 'a>>;

/// Resolves the country the current process is running in.
pub trait GeolocationAdapter: Send + Sync {
    /// Look up the current country. Resolves to `Unknown` on any failure.
    fn lookup_country(&self) -> CountryFuture<'_>;
}

/// Relevant subset of an ipinfo-style response body.
#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    country: Option<String>,
}

/// HTTP geolocation client for ipinfo-compatible endpoints.
#[derive(Debug, Clone)]
pub struct IpInfoLocator {
    http: reqwest::Client,
    endpoint: Url,
}

impl IpInfoLocator {
    /// Create a client for `endpoint`. Every request is bounded by `timeout`.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, ProbeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http, endpoint })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Perform one lookup, surfacing the failure cause.
    pub async fn fetch(&self) -> Result<CountryCode, ProbeError> {
        let endpoint = self.endpoint.to_string();
        let resp = self
            .http
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProbeError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body: IpInfoResponse = resp.json().await.map_err(|e| ProbeError::Deserialization {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let parsed = body.country.as_deref().map(CountryCode::new);
        match parsed {
            Some(Ok(code)) => Ok(code),
            _ => Err(ProbeError::MissingCountry {
                endpoint,
                raw: body.country,
            }),
        }
    }
}

impl GeolocationAdapter for IpInfoLocator {
    fn lookup_country(&self) -> CountryFuture<'_> {
        Box::pin(async move {
            match self.fetch().await {
                Ok(code) => {
                    tracing::debug!(country = %code, "geolocation resolved");
                    ResolvedCountry::Known(code)
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "geolocation lookup failed, treating country as unknown"
                    );
                    ResolvedCountry::Unknown
                }
            }
        })
    }
}

/// Adapter that always reports the same country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCountry(pub ResolvedCountry);

impl FixedCountry {
    /// Always resolve to `code`.
    pub fn known(code: CountryCode) -> Self {
        Self(ResolvedCountry::Known(code))
    }

    /// Always resolve to `Unknown`.
    pub fn unknown() -> Self {
        Self(ResolvedCountry::Unknown)
    }
}

impl GeolocationAdapter for FixedCountry {
    fn lookup_country(&self) -> CountryFuture<'_> {
        let country = self.0.clone();
        Box::pin(async move { country })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_country_resolves_as_configured() {
        let us = FixedCountry::known(CountryCode::new("US").unwrap());
        assert_eq!(
            us.lookup_country().await,
            ResolvedCountry::Known(CountryCode::new("US").unwrap())
        );
        assert_eq!(
            FixedCountry::unknown().lookup_country().await,
            ResolvedCountry::Unknown
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unknown() {
        let locator = IpInfoLocator::new(
            Url::parse("http://127.0.0.1:1/json").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(locator.fetch().await.is_err());
        assert_eq!(locator.lookup_country().await, ResolvedCountry::Unknown);
    }
}
