//! # Seats Subcommand
//!
//! Inspect or reset the seat counter of a license. Reset is the only way
//! seats are ever returned.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use lvs_core::LicenseKey;
use lvs_state::SeatCounterStore;
use serde::Serialize;

use crate::context::Context;
use crate::write_json;

/// Arguments for the `lvs seats` subcommand.
#[derive(Args, Debug)]
pub struct SeatsArgs {
    #[command(subcommand)]
    pub command: SeatsCommand,
}

/// Seat subcommands.
#[derive(Subcommand, Debug)]
pub enum SeatsCommand {
    /// Show the current seat count and limit.
    Show {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Reset the seat counter to zero.
    Reset {
        #[arg(value_name = "KEY")]
        key: String,
    },
}

#[derive(Debug, Serialize)]
struct SeatStatus<'a> {
    license_key: &'a str,
    count: u32,
    seat_limit: u32,
}

#[derive(Debug, Serialize)]
struct SeatReset<'a> {
    license_key: &'a str,
    previous_count: u32,
    count: u32,
}

/// Execute the seats subcommand.
pub fn run_seats(args: &SeatsArgs, ctx: &Context, out: &mut dyn Write) -> Result<u8> {
    match &args.command {
        SeatsCommand::Show { key } => cmd_show(ctx, &LicenseKey::new(key)?, out),
        SeatsCommand::Reset { key } => cmd_reset(ctx, &LicenseKey::new(key)?, out),
    }
}

fn cmd_show(ctx: &Context, key: &LicenseKey, out: &mut dyn Write) -> Result<u8> {
    let record = ctx.require_record(key)?;
    let count = ctx.store.peek(key)?;
    write_json(
        out,
        &SeatStatus {
            license_key: key.as_str(),
            count,
            seat_limit: record.seat_limit,
        },
    )?;
    Ok(0)
}

fn cmd_reset(ctx: &Context, key: &LicenseKey, out: &mut dyn Write) -> Result<u8> {
    ctx.require_record(key)?;
    let previous_count = ctx.store.reset(key)?;
    tracing::info!(license_key = %key, previous_count, "seat counter reset");
    write_json(
        out,
        &SeatReset {
            license_key: key.as_str(),
            previous_count,
            count: 0,
        },
    )?;
    Ok(0)
}
