//! # Logs Subcommand
//!
//! Prints recent verifications of a license from the audit log, newest
//! first.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use lvs_core::LicenseKey;
use lvs_state::VerificationLog;

use crate::context::Context;
use crate::write_json;

/// Arguments for the `lvs logs` subcommand.
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// License key whose verifications to list.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Maximum number of entries.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

/// Execute the logs subcommand.
pub fn run_logs(args: &LogsArgs, ctx: &Context, out: &mut dyn Write) -> Result<u8> {
    let key = LicenseKey::new(&args.key)?;
    let entries = ctx.store.entries_for(&key, args.limit)?;
    tracing::debug!(license_key = %key, entries = entries.len(), "audit entries read");
    write_json(out, &entries)?;
    Ok(0)
}
