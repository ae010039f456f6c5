//! # Seat Counters
//!
//! One non-negative integer per license key, counting claimed seats.
//!
//! ## Invariant
//!
//! After every successful [`SeatCounterStore::try_claim`],
//! `0 <= count <= limit`. A refused claim leaves the counter unchanged.
//! Claims against the same key are totally ordered: the comparison with the
//! limit and the increment happen inside one critical section, so two
//! concurrent claims for the last free seat yield exactly one success.
//!
//! There is deliberately no `release`/decrement operation. The only other
//! write path is the administrative [`SeatCounterStore::reset`].

use std::collections::HashMap;
use std::sync::Arc;

use lvs_core::LicenseKey;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Outcome of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatClaim {
    /// Whether a seat was consumed.
    pub succeeded: bool,
    /// Counter value after the attempt (unchanged when refused).
    pub count: u32,
}

/// Durable per-license seat counter with an atomic claim primitive.
pub trait SeatCounterStore: Send + Sync {
    /// Current count for `key`; 0 if the key has never been claimed.
    /// Never writes.
    fn peek(&self, key: &LicenseKey) -> Result<u32, StoreError>;

    /// Atomically increment the counter for `key` if it is below `limit`.
    fn try_claim(&self, key: &LicenseKey, limit: u32) -> Result<SeatClaim, StoreError>;

    /// Administrative reset to zero. Returns the count before the reset.
    fn reset(&self, key: &LicenseKey) -> Result<u32, StoreError>;
}

/// In-memory seat counters guarded by a single mutex.
///
/// `parking_lot::Mutex` does not poison, so a panicking holder cannot wedge
/// the counters for later callers.
#[derive(Debug, Clone, Default)]
pub struct MemorySeatCounter {
    counts: Arc<Mutex<HashMap<LicenseKey, u32>>>,
}

impl MemorySeatCounter {
    /// Create an empty counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a counter, e.g. for tests or to restore a snapshot.
    pub fn with_count(self, key: LicenseKey, count: u32) -> Self {
        self.counts.lock().insert(key, count);
        self
    }
}

impl SeatCounterStore for MemorySeatCounter {
    fn peek(&self, key: &LicenseKey) -> Result<u32, StoreError> {
        Ok(self.counts.lock().get(key).copied().unwrap_or(0))
    }

    fn try_claim(&self, key: &LicenseKey, limit: u32) -> Result<SeatClaim, StoreError> {
        let mut counts = self.counts.lock();
        let count = counts.entry(key.clone()).or_insert(0);
        if *count < limit {
            *count += 1;
            Ok(SeatClaim {
                succeeded: true,
                count: *count,
            })
        } else {
            Ok(SeatClaim {
                succeeded: false,
                count: *count,
            })
        }
    }

    fn reset(&self, key: &LicenseKey) -> Result<u32, StoreError> {
        Ok(self.counts.lock().insert(key.clone(), 0).unwrap_or(0))
    }
}
