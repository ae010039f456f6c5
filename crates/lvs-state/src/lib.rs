//! # lvs-state — License Records, Seat Counters, Audit Log
//!
//! The stateful leaves of the verification stack:
//!
//! - **License records** (`license.rs`): read-only constraint records keyed
//!   by license key, loaded from a YAML/JSON catalog into a
//!   [`MemoryRecordStore`].
//!
//! - **Seat counters** (`seats.rs`, `sqlite.rs`): one integer per license
//!   key. The only mutation paths are [`SeatCounterStore::try_claim`], an
//!   atomic compare-and-increment, and the administrative
//!   [`SeatCounterStore::reset`].
//!
//! - **Audit log** (`audit.rs`): append-only record of completed
//!   verifications.
//!
//! ## Backends
//!
//! | Concern        | In-memory                 | Durable                 |
//! |----------------|---------------------------|-------------------------|
//! | Seat counters  | [`MemorySeatCounter`]     | [`SqliteStore`]         |
//! | Audit log      | [`MemoryVerificationLog`] | [`SqliteStore`]         |
//!
//! `SqliteStore` serialises claims with `BEGIN IMMEDIATE` transactions, so
//! the seat invariant also holds across processes sharing the database file.

pub mod audit;
pub mod error;
pub mod license;
pub mod seats;
pub mod sqlite;

pub use audit::{MemoryVerificationLog, VerificationLog, VerificationLogEntry};
pub use error::StoreError;
pub use license::{LicenseCatalog, LicenseRecord, LicenseRecordStore, MemoryRecordStore};
pub use seats::{MemorySeatCounter, SeatClaim, SeatCounterStore};
pub use sqlite::SqliteStore;
