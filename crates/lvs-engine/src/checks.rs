//! # Check Evaluators
//!
//! One function per constraint. The country, device and expiry checks are
//! pure. The seat check is the only one touching state, and only through
//! [`SeatCounterStore::peek`] or the atomic [`SeatCounterStore::try_claim`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use lvs_core::{
    days_until, describe_country, parse_calendar_date, CountryCode, DeviceId, LicenseKey,
    ResolvedCountry,
};
use lvs_state::SeatCounterStore;

use crate::report::CheckResult;

/// Days before expiry at which a passing expiry check becomes a warning.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

fn days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

/// Geographic check. An unknown country is never permitted, and neither is
/// any country while the record lists a malformed code.
pub fn check_country(
    current: &ResolvedCountry,
    allowed: &BTreeSet<CountryCode>,
    invalid: &[String],
) -> CheckResult {
    if !invalid.is_empty() {
        return CheckResult::fail(format!(
            "invalid country code configured: {}",
            invalid.join(", ")
        ));
    }
    if allowed.is_empty() {
        return CheckResult::fail("no allowed countries configured");
    }
    match current.code() {
        Some(code) if allowed.contains(code) => {
            CheckResult::pass(format!("country {} is permitted", describe_country(current)))
        }
        _ => CheckResult::fail(format!("country not permitted: {}", describe_country(current))),
    }
}

/// Device check. Passes if any local identifier is allowed.
///
/// [`DeviceId`] is upper-cased on construction, so set membership is
/// already case-insensitive.
pub fn check_device(local: &BTreeSet<DeviceId>, allowed: &BTreeSet<DeviceId>) -> CheckResult {
    if allowed.is_empty() {
        return CheckResult::fail("no device identifiers configured");
    }
    match local.intersection(allowed).next() {
        Some(id) => CheckResult::pass(format!("device {id} is authorized")),
        None => CheckResult::fail("device not authorized"),
    }
}

/// Expiry check against the inclusive last valid day.
pub fn check_expiry(today: NaiveDate, expiry: &str) -> CheckResult {
    let expiry = match parse_calendar_date(expiry) {
        Ok(date) => date,
        Err(e) => return CheckResult::fail(e.to_string()),
    };
    let left = days_until(today, expiry);
    if left < 0 {
        CheckResult::fail(format!("license expired {} ago", days(-left)))
    } else if left <= EXPIRY_WARNING_DAYS {
        CheckResult::notice(format!("license expires in {}; please renew", days(left)))
    } else {
        CheckResult::pass(format!("license valid for {} more days", left))
    }
}

/// Seat quota check.
///
/// With `claim` false this only reads the counter. With `claim` true it
/// performs one atomic compare-and-increment. A store fault fails the
/// check without claiming anything.
pub fn check_seats(
    store: &dyn SeatCounterStore,
    key: &LicenseKey,
    limit: u32,
    claim: bool,
) -> CheckResult {
    if claim {
        match store.try_claim(key, limit) {
            Ok(c) if c.succeeded => CheckResult::pass(format!("seat claimed: {}/{limit}", c.count)),
            Ok(c) => CheckResult::fail(format!("seat limit reached: {}/{limit}", c.count)),
            Err(e) => {
                tracing::error!(license_key = %key, error = %e, "seat claim failed");
                CheckResult::fail(format!("seat check failed: {e}"))
            }
        }
    } else {
        match store.peek(key) {
            Ok(count) if count < limit => {
                CheckResult::pass(format!("seat count ok: {count}/{limit}"))
            }
            Ok(count) => CheckResult::fail(format!("seat limit reached: {count}/{limit}")),
            Err(e) => {
                tracing::error!(license_key = %key, error = %e, "seat lookup failed");
                CheckResult::fail(format!("seat check failed: {e}"))
            }
        }
    }
}
