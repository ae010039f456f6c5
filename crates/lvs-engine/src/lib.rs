//! # lvs-engine -- Multi-factor license evaluation
//!
//! Four independent checks decide whether a license may be used here and
//! now:
//!
//! | Check   | Passes when                                          |
//! |---------|------------------------------------------------------|
//! | country | the resolved country is in the allowed set           |
//! | device  | some local hardware identifier is in the allowed set |
//! | expiry  | today is on or before the expiry date                |
//! | seats   | the seat counter is below the limit (or a claim wins)|
//!
//! [`Verifier`] runs all four and aggregates them into a
//! [`VerificationReport`]. An expiry within 30 days passes with a notice.
//! Country lookup failures are evaluated as an unknown country, which never
//! passes.

pub mod checks;
pub mod clock;
pub mod engine;
pub mod error;
pub mod report;

pub use checks::{check_country, check_device, check_expiry, check_seats, EXPIRY_WARNING_DAYS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::Verifier;
pub use error::EngineError;
pub use report::{
    CheckName, CheckResult, CheckView, ResponseDetails, VerificationReport, VerificationResponse,
    NOT_FOUND_REASON,
};
