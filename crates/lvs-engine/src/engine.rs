//! # Verification Engine
//!
//! [`Verifier::verify`] runs the full evaluation for one license key:
//!
//! 1. Look up the record. A missing key short-circuits with a failed
//!    report; a faulting record store is the only [`EngineError`].
//! 2. Run country, device, expiry and seats in that order. Every check
//!    runs even after an earlier failure.
//! 3. Verdict is the AND of all checks. Warnings collect every failure
//!    reason plus the near-expiry notice.
//! 4. Compute the token, then append an audit entry. A failed append is
//!    logged and does not change the report.
//!
//! Only the seat check writes state, and only when claiming.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use lvs_core::{LicenseKey, ResolvedCountry, VerificationToken};
use lvs_probe::{DeviceIdentityAdapter, GeolocationAdapter};
use lvs_state::{LicenseRecordStore, SeatCounterStore, VerificationLog, VerificationLogEntry};
use uuid::Uuid;

use crate::checks::{check_country, check_device, check_expiry, check_seats};
use crate::clock::{Clock, SystemClock};
use crate::error::EngineError;
use crate::report::{CheckName, CheckResult, VerificationReport};

/// The multi-factor license verifier.
#[derive(Clone)]
pub struct Verifier {
    records: Arc<dyn LicenseRecordStore>,
    seats: Arc<dyn SeatCounterStore>,
    geo: Arc<dyn GeolocationAdapter>,
    devices: Arc<dyn DeviceIdentityAdapter>,
    log: Option<Arc<dyn VerificationLog>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("audit_log", &self.log.is_some())
            .finish_non_exhaustive()
    }
}

impl Verifier {
    /// Build a verifier on the system clock, without an audit log.
    pub fn new(
        records: Arc<dyn LicenseRecordStore>,
        seats: Arc<dyn SeatCounterStore>,
        geo: Arc<dyn GeolocationAdapter>,
        devices: Arc<dyn DeviceIdentityAdapter>,
    ) -> Self {
        Self {
            records,
            seats,
            geo,
            devices,
            log: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Record every completed verification in `log`.
    pub fn with_log(mut self, log: Arc<dyn VerificationLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verify `key`. With `claim` set, a successful seat check consumes one
    /// seat.
    pub async fn verify(
        &self,
        key: &LicenseKey,
        claim: bool,
    ) -> Result<VerificationReport, EngineError> {
        self.verify_with_deadline(key, claim, None).await
    }

    /// Like [`Verifier::verify`], abandoning the geolocation wait after
    /// `deadline`. An abandoned lookup counts as an unknown country.
    pub async fn verify_with_deadline(
        &self,
        key: &LicenseKey,
        claim: bool,
        deadline: Option<Duration>,
    ) -> Result<VerificationReport, EngineError> {
        let record = self.records.get_record(key).map_err(|e| {
            tracing::error!(license_key = %key, error = %e, "license record lookup failed");
            EngineError::RecordStore(e)
        })?;

        let Some(record) = record else {
            tracing::info!(license_key = %key, "license key not found");
            let report = VerificationReport::not_found(key.clone(), self.clock.now());
            self.append_log(&report).await;
            return Ok(report);
        };

        let country = self.resolve_country(deadline).await;
        let local_devices = self.devices.local_device_ids();
        let verified_at = self.clock.now();
        let today = verified_at.date();

        let mut checks = BTreeMap::new();
        checks.insert(
            CheckName::Country,
            check_country(
                &country,
                &record.allowed_countries,
                &record.invalid_countries,
            ),
        );
        checks.insert(
            CheckName::Device,
            check_device(&local_devices, &record.allowed_device_ids),
        );
        checks.insert(CheckName::Expiry, check_expiry(today, &record.expiry));
        checks.insert(
            CheckName::Seats,
            self.seat_check(key, record.seat_limit, claim).await,
        );

        for (name, result) in &checks {
            tracing::debug!(
                license_key = %key,
                check = %name,
                passed = result.passed,
                reason = %result.reason,
                "check evaluated"
            );
        }

        let valid = checks.values().all(|c| c.passed);
        let warnings = CheckName::ALL
            .iter()
            .filter_map(|name| checks.get(name))
            .filter(|c| c.is_reportable())
            .map(|c| c.reason.clone())
            .collect();

        let report = VerificationReport {
            license_key: key.clone(),
            license_found: true,
            tier: Some(record.tier),
            features: record.features,
            checks,
            valid,
            warnings,
            token: VerificationToken::compute(key, valid, today),
            verified_at,
            observed_country: Some(country),
            observed_device_ids: local_devices.into_iter().collect(),
        };

        tracing::info!(
            license_key = %key,
            valid = report.valid,
            claim,
            warnings = report.warnings.len(),
            "license verified"
        );
        self.append_log(&report).await;
        Ok(report)
    }

    async fn resolve_country(&self, deadline: Option<Duration>) -> ResolvedCountry {
        let lookup = self.geo.lookup_country();
        match deadline {
            None => lookup.await,
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(country) => country,
                Err(_) => {
                    tracing::warn!(
                        deadline_ms = limit.as_millis() as u64,
                        "geolocation lookup exceeded caller deadline, treating country as unknown"
                    );
                    ResolvedCountry::Unknown
                }
            },
        }
    }

    async fn seat_check(&self, key: &LicenseKey, limit: u32, claim: bool) -> CheckResult {
        let seats = Arc::clone(&self.seats);
        let owned_key = key.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            check_seats(seats.as_ref(), &owned_key, limit, claim)
        })
        .await;
        outcome.unwrap_or_else(|e| {
            tracing::error!(license_key = %key, error = %e, "seat check task failed");
            CheckResult::fail(format!("seat check failed: {e}"))
        })
    }

    async fn append_log(&self, report: &VerificationReport) {
        let Some(log) = &self.log else {
            return;
        };
        let entry = VerificationLogEntry {
            id: Uuid::new_v4(),
            license_key: report.license_key.clone(),
            valid: report.valid,
            country: report.observed_country.clone(),
            device_ids: report.observed_device_ids.clone(),
            message: report.summary(),
            token: report.token.clone(),
            verified_at: report.verified_at,
        };
        let log = Arc::clone(log);
        let result = tokio::task::spawn_blocking(move || log.append(&entry)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(
                license_key = %report.license_key,
                error = %e,
                "failed to append verification log entry"
            ),
            Err(e) => tracing::warn!(
                license_key = %report.license_key,
                error = %e,
                "verification log task failed"
            ),
        }
    }
}
