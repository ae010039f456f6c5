//! # Error Types
//!
//! Validation errors raised by the core newtype constructors and date
//! parsing. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.

use thiserror::Error;

/// Top-level error type for core validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LvsError {
    /// An identifier failed validation.
    #[error("invalid {kind}: {reason}")]
    InvalidIdentifier {
        /// Which identifier namespace was being constructed.
        kind: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A calendar date could not be parsed.
    #[error("invalid date {input:?}: expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },
}

impl LvsError {
    pub(crate) fn identifier(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_error_display() {
        let err = LvsError::identifier("license key", "must not be empty");
        assert_eq!(err.to_string(), "invalid license key: must not be empty");
    }

    #[test]
    fn date_error_display() {
        let err = LvsError::InvalidDate {
            input: "31/12/2025".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid date \"31/12/2025\": expected YYYY-MM-DD"
        );
    }
}
