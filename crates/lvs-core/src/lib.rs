//! # lvs-core — Foundational Types for the License Verification Stack
//!
//! Every other crate in the workspace depends on `lvs-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `LicenseKey`, `CountryCode`
//!    and `DeviceId` all have validated, normalising constructors. Device
//!    identifiers are upper-cased at construction so comparisons are
//!    case-insensitive by construction.
//!
//! 2. **Unresolved location is a value, not an error.** [`ResolvedCountry`]
//!    carries either a code or `Unknown`; callers evaluate it like any other
//!    outcome.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] is UTC with seconds precision,
//!    and calendar evaluation uses the UTC date.
//!
//! 4. **One token derivation.** [`VerificationToken::compute()`] is the only
//!    way to produce a token, so every consumer fingerprints the same fields.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `lvs-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod country;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use country::{country_name, describe_country};
pub use digest::{sha256_hex, VerificationToken};
pub use error::LvsError;
pub use identity::{CountryCode, DeviceId, LicenseKey, ResolvedCountry};
pub use temporal::{days_until, parse_calendar_date, Timestamp};
