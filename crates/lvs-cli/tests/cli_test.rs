//! Subcommand handlers against a temporary catalog and database.

use std::path::Path;

use clap::ValueEnum;
use lvs_cli::logs::{run_logs, LogsArgs};
use lvs_cli::seats::{run_seats, SeatsArgs, SeatsCommand};
use lvs_cli::verify::{run_verify, Mode, ProbeOpts, VerifyArgs};
use lvs_cli::{Context, StoreOpts};
use lvs_probe::ProbeConfig;
use serde_json::Value;

const CATALOG: &str = r#"
licenses:
  - key: PREMIUM-123
    allowed_countries: [US, IN]
    allowed_device_ids: ["00:1A:2B:3C:4D:5E"]
    expiry: "2099-12-31"
    seat_limit: 2
    tier: Premium
    features: [All Features, Priority Support]
  - key: EXPIRED-999
    allowed_countries: [US]
    allowed_device_ids: ["00:1A:2B:3C:4D:5E"]
    expiry: "2023-01-01"
    seat_limit: 10
    tier: Standard
"#;

fn context(dir: &Path) -> Context {
    let catalog = dir.join("licenses.yaml");
    std::fs::write(&catalog, CATALOG).unwrap();
    Context::open(&StoreOpts {
        catalog,
        db: dir.join("state").join("lvs.sqlite3"),
    })
    .unwrap()
}

fn probe(country: &'static str) -> ProbeConfig {
    ProbeConfig::from_lookup(|var| match var {
        "LVS_COUNTRY" => Some(country.to_string()),
        "LVS_DEVICE_IDS" => Some("00:1a:2b:3c:4d:5e".to_string()),
        _ => None,
    })
    .unwrap()
}

async fn verify(ctx: &Context, key: &str, mode: Mode, country: &'static str) -> (u8, Value) {
    let args = VerifyArgs {
        key: key.to_string(),
        mode,
    };
    let mut out = Vec::new();
    let code = run_verify(&args, &ProbeOpts::default(), ctx, probe(country), &mut out)
        .await
        .unwrap();
    (code, serde_json::from_slice(&out).unwrap())
}

fn seats(ctx: &Context, command: SeatsCommand) -> anyhow::Result<Value> {
    let mut out = Vec::new();
    run_seats(&SeatsArgs { command }, ctx, &mut out)?;
    Ok(serde_json::from_slice(&out).unwrap())
}

#[test]
fn mode_parses_kebab_case() {
    assert_eq!(Mode::from_str("verify", false).unwrap(), Mode::Verify);
    assert_eq!(Mode::from_str("add-user", false).unwrap(), Mode::AddUser);
    assert!(Mode::from_str("claim", false).is_err());
}

#[tokio::test]
async fn verify_valid_license_prints_report() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());

    let (code, body) = verify(&ctx, "PREMIUM-123", Mode::Verify, "US").await;
    assert_eq!(code, 0);
    assert_eq!(body["valid"], true);
    assert_eq!(body["details"]["tier"], "Premium");
    assert_eq!(
        body["details"]["checks"]["country"]["message"],
        "country United States (US) is permitted"
    );
    assert_eq!(body["details"]["checks"]["seats"]["message"], "seat count ok: 0/2");
}

#[tokio::test]
async fn invalid_license_still_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());

    let (code, body) = verify(&ctx, "PREMIUM-123", Mode::Verify, "DE").await;
    assert_eq!(code, 0);
    assert_eq!(body["valid"], false);
    assert_eq!(
        body["message"],
        "License verification failed: country not permitted: Germany (DE)"
    );

    let (code, body) = verify(&ctx, "MISSING-1", Mode::Verify, "US").await;
    assert_eq!(code, 0);
    assert_eq!(body["message"], "License verification failed: license key not found");
}

#[tokio::test]
async fn add_user_persists_across_contexts() {
    let dir = tempfile::tempdir().unwrap();

    {
        let ctx = context(dir.path());
        let (_, body) = verify(&ctx, "PREMIUM-123", Mode::AddUser, "US").await;
        assert_eq!(body["details"]["checks"]["seats"]["message"], "seat claimed: 1/2");
    }

    let ctx = context(dir.path());
    let (_, body) = verify(&ctx, "PREMIUM-123", Mode::AddUser, "US").await;
    assert_eq!(body["details"]["checks"]["seats"]["message"], "seat claimed: 2/2");

    let (_, body) = verify(&ctx, "PREMIUM-123", Mode::AddUser, "US").await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["details"]["checks"]["seats"]["message"], "seat limit reached: 2/2");

    let status = seats(
        &ctx,
        SeatsCommand::Show {
            key: "PREMIUM-123".into(),
        },
    )
    .unwrap();
    assert_eq!(status["count"], 2);
    assert_eq!(status["seat_limit"], 2);
}

#[tokio::test]
async fn reset_returns_previous_count() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    verify(&ctx, "PREMIUM-123", Mode::AddUser, "US").await;

    let reset = seats(
        &ctx,
        SeatsCommand::Reset {
            key: "PREMIUM-123".into(),
        },
    )
    .unwrap();
    assert_eq!(reset["previous_count"], 1);
    assert_eq!(reset["count"], 0);

    let status = seats(
        &ctx,
        SeatsCommand::Show {
            key: "PREMIUM-123".into(),
        },
    )
    .unwrap();
    assert_eq!(status["count"], 0);
}

#[test]
fn seats_for_unknown_license_fail() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    let err = seats(
        &ctx,
        SeatsCommand::Show {
            key: "MISSING-1".into(),
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("MISSING-1"));
}

#[tokio::test]
async fn logs_list_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path());
    verify(&ctx, "PREMIUM-123", Mode::Verify, "US").await;
    verify(&ctx, "PREMIUM-123", Mode::Verify, "DE").await;
    verify(&ctx, "EXPIRED-999", Mode::Verify, "US").await;

    let mut out = Vec::new();
    let args = LogsArgs {
        key: "PREMIUM-123".into(),
        limit: 20,
    };
    assert_eq!(run_logs(&args, &ctx, &mut out).unwrap(), 0);
    let entries: Value = serde_json::from_slice(&out).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["valid"], false);
    assert_eq!(entries[1]["valid"], true);
}

#[test]
fn missing_catalog_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Context::open(&StoreOpts {
        catalog: dir.path().join("absent.yaml"),
        db: dir.path().join("lvs.sqlite3"),
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("failed to load license catalog"));
}
