//! SQLite store behaviour across connections and restarts.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::NaiveDate;
use lvs_core::{DeviceId, LicenseKey, ResolvedCountry, Timestamp, VerificationToken};
use lvs_state::{SeatCounterStore, SqliteStore, VerificationLog, VerificationLogEntry};
use uuid::Uuid;

fn key(s: &str) -> LicenseKey {
    LicenseKey::new(s).unwrap()
}

fn entry(k: &LicenseKey, message: &str) -> VerificationLogEntry {
    VerificationLogEntry {
        id: Uuid::new_v4(),
        license_key: k.clone(),
        valid: true,
        country: Some(ResolvedCountry::from_raw("IN")),
        device_ids: vec![DeviceId::new("00:1A:2B:3C:4D:5E").unwrap()],
        message: message.to_string(),
        token: VerificationToken::compute(k, true, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
        verified_at: Timestamp::now(),
    }
}

#[test]
fn counters_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lvs.sqlite3");
    let k = key("STANDARD-456");

    {
        let store = SqliteStore::open(&path).unwrap();
        assert!(store.try_claim(&k, 10).unwrap().succeeded);
        assert!(store.try_claim(&k, 10).unwrap().succeeded);
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.peek(&k).unwrap(), 2);
    assert_eq!(store.path(), Some(path.as_path()));
}

#[test]
fn open_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state").join("lvs.sqlite3");
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.peek(&key("K")).unwrap(), 0);
    assert!(path.exists());
}

#[test]
fn separate_connections_race_for_last_seat() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lvs.sqlite3");
    // Create the schema before the racers open their own connections.
    drop(SqliteStore::open(&path).unwrap());

    for round in 0..10 {
        let k = key(&format!("RACE-{round}"));
        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let path = path.clone();
                let k = k.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let store = SqliteStore::open(&path).unwrap();
                    barrier.wait();
                    store.try_claim(&k, 1).unwrap().succeeded
                })
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1, "round {round}");

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.peek(&k).unwrap(), 1);
    }
}

#[test]
fn shared_store_never_exceeds_limit() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(&dir.path().join("lvs.sqlite3")).unwrap());
    let k = key("CROWD");
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let k = k.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.try_claim(&k, 3).unwrap().succeeded
            })
        })
        .collect();
    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(wins, 3);
    assert_eq!(store.peek(&k).unwrap(), 3);
}

#[test]
fn log_entries_newest_first_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lvs.sqlite3");
    let k = key("PREMIUM-123");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.append(&entry(&k, "first")).unwrap();
        store.append(&entry(&key("OTHER"), "other")).unwrap();
        store.append(&entry(&k, "second")).unwrap();
        store.append(&entry(&k, "third")).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let messages: Vec<_> = store
        .entries_for(&k, 2)
        .unwrap()
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(messages, vec!["third", "second"]);
    assert!(store.entries_for(&key("NONE"), 10).unwrap().is_empty());
}
