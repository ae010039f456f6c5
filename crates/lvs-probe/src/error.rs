//! Probe error types.

/// Errors from the geolocation lookup.
///
/// These never reach a verification caller: the geolocation adapter
/// downgrades every one of them to an unknown country.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// HTTP transport error, including timeouts.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("{endpoint} returned {status}")]
    Status { endpoint: String, status: u16 },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The response carried no usable country code.
    #[error("{endpoint} returned no valid country code (got {raw:?})")]
    MissingCountry {
        endpoint: String,
        raw: Option<String>,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
