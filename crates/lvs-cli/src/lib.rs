//! # lvs-cli — CLI Tool for the License Verification Stack
//!
//! Provides the `lvs` command-line interface.
//!
//! ## Subcommands
//!
//! - `lvs verify <KEY> [verify|add-user]`: Run a verification, optionally
//!   claiming a seat.
//! - `lvs seats show <KEY>` / `lvs seats reset <KEY>`: Seat counters.
//! - `lvs logs <KEY>`: Recent verifications for a license.
//!
//! ## Output Contract
//!
//! Every subcommand prints exactly one JSON document on stdout. Diagnostics
//! go to stderr through `tracing`. Exit status is 0 whenever a report was
//! produced, including for invalid licenses:
//!
//! ```bash
//! lvs verify PREMIUM-123 add-user | jq .valid
//! ```

pub mod context;
pub mod logs;
pub mod seats;
pub mod verify;

pub use context::{Context, StoreOpts};

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
