//! Time source for verification.

use chrono::{NaiveDate, NaiveTime};
use lvs_core::Timestamp;

/// Supplies the evaluation instant. Dates are UTC calendar dates.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;

    /// Current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock, UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(Timestamp);

impl FixedClock {
    /// Stop at `at`.
    pub fn new(at: Timestamp) -> Self {
        Self(at)
    }

    /// Stop at noon UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::hours(12);
        Self(Timestamp::from_utc(noon))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
