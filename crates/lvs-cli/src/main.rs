//! # lvs CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Logs go to stderr; stdout carries only the JSON result.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lvs_cli::logs::{run_logs, LogsArgs};
use lvs_cli::seats::{run_seats, SeatsArgs};
use lvs_cli::verify::{run_verify, ProbeOpts, VerifyArgs};
use lvs_cli::{Context, StoreOpts};
use lvs_probe::ProbeConfig;

/// License Verification Stack CLI
///
/// Verifies software licenses against country, device, expiry and seat
/// constraints, and administers seat counters.
#[derive(Parser, Debug)]
#[command(name = "lvs", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    stores: StoreOpts,

    #[command(flatten)]
    probe: ProbeOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a license, optionally claiming a seat.
    Verify(VerifyArgs),

    /// Show or reset seat counters.
    Seats(SeatsArgs),

    /// List recent verifications of a license.
    Logs(LogsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("lvs CLI starting");

    let mut stdout = std::io::stdout().lock();
    match run(cli, &mut stdout).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            let body = serde_json::json!({ "error": format!("{e:#}") });
            let _ = writeln!(stdout, "{body}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<u8> {
    let ctx = Context::open(&cli.stores)?;
    match cli.command {
        Commands::Verify(args) => {
            let probe = ProbeConfig::from_env()?;
            run_verify(&args, &cli.probe, &ctx, probe, out).await
        }
        Commands::Seats(args) => run_seats(&args, &ctx, out),
        Commands::Logs(args) => run_logs(&args, &ctx, out),
    }
}
