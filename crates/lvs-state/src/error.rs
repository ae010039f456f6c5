//! Store error type shared by the record store, seat counters, and audit log.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the state backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem access failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The license catalog could not be parsed.
    #[error("failed to parse catalog {path}: {reason}")]
    CatalogParse {
        /// The catalog file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The license catalog parsed but violates a structural rule.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A stored row could not be decoded.
    #[error("corrupt stored value: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parse_display() {
        let err = StoreError::CatalogParse {
            path: PathBuf::from("licenses.yaml"),
            reason: "expected mapping".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse catalog licenses.yaml: expected mapping"
        );
    }

    #[test]
    fn invalid_catalog_display() {
        let err = StoreError::InvalidCatalog("duplicate key PREMIUM-123".to_string());
        assert_eq!(err.to_string(), "invalid catalog: duplicate key PREMIUM-123");
    }
}
