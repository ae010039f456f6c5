//! # Verify Subcommand
//!
//! Runs the full multi-factor evaluation for one license key and prints the
//! JSON response. With mode `add-user` a passing seat check claims a seat.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use lvs_core::LicenseKey;
use lvs_engine::Verifier;
use lvs_probe::{device_adapter, geolocation_adapter, ProbeConfig};

use crate::context::Context;
use crate::write_json;

/// Verification mode.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Evaluate without consuming a seat.
    #[default]
    Verify,
    /// Evaluate and claim a seat if one is free, whatever the other checks
    /// return.
    AddUser,
}

/// Arguments for the `lvs verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// License key to verify.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Whether to claim a seat.
    #[arg(value_enum, value_name = "MODE", default_value_t = Mode::Verify)]
    pub mode: Mode,
}

/// Environment probe tuning shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ProbeOpts {
    /// Geolocation timeout in seconds (1-30). Overrides LVS_GEO_TIMEOUT_SECS.
    #[arg(long, global = true, value_name = "SECS")]
    pub geo_timeout_secs: Option<u64>,

    /// Give up waiting for geolocation after this many milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub deadline_ms: Option<u64>,
}

/// Execute the verify subcommand.
pub async fn run_verify(
    args: &VerifyArgs,
    opts: &ProbeOpts,
    ctx: &Context,
    probe: ProbeConfig,
    out: &mut dyn Write,
) -> Result<u8> {
    let key = LicenseKey::new(&args.key)?;
    let probe = match opts.geo_timeout_secs {
        Some(secs) => probe.with_timeout_secs(secs),
        None => probe,
    };

    let verifier = Verifier::new(
        ctx.records.clone(),
        ctx.store.clone(),
        geolocation_adapter(&probe).context("failed to configure geolocation")?,
        device_adapter(&probe),
    )
    .with_log(ctx.store.clone());

    let claim = args.mode == Mode::AddUser;
    let deadline = opts.deadline_ms.map(Duration::from_millis);
    let report = verifier.verify_with_deadline(&key, claim, deadline).await?;

    tracing::info!(license_key = %key, valid = report.valid, claim, "verification finished");
    write_json(out, &report.to_response())?;
    Ok(0)
}
