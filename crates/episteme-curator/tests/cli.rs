//! `episteme-curate` run as a subprocess

use std::path::Path;
use std::process::{Command, Output};

use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};

use episteme_common::{Dimension, Snapshot, SnapshotStore, VectorSet};
use episteme_curator::FsSnapshotStore;

fn curate_bin(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_episteme-curate"))
        .args(args)
        .arg(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// Five recent snapshots plus two older ones that lose their window
async fn seed(dir: &Path) {
    let store = FsSnapshotStore::new(dir);
    let t = Utc.with_ymd_and_hms(2024, 6, 10, 18, 0, 0).unwrap();
    let impacts = [0.3, 0.3, 0.3, 0.3, 0.3, 0.1, 0.2];
    for (h, impact) in impacts.into_iter().enumerate() {
        let vectors = VectorSet::new()
            .with(Dimension::Impact, impact)
            .with(Dimension::Completion, 0.1);
        let at = t - Duration::hours(h as i64);
        store
            .write(&Snapshot::new(at, vectors, json!({ "note": "cli" })))
            .await
            .unwrap();
    }
}

#[test]
fn test_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = curate_bin(&["curate"], &dir.path().join("absent"));

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("absent"));
}

#[tokio::test]
async fn test_json_dry_run_report() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path()).await;

    let out = curate_bin(
        &["curate", "--json", "--dry-run", "--recent", "5", "--window-hours", "24"],
        dir.path(),
    );
    assert!(out.status.success());

    let report: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["total"], 7);
    assert_eq!(report["archived"], 2);
    assert_eq!(report["dry_run"], true);
    let rate = report["retention_rate"].as_f64().unwrap();
    assert!((rate - 5.0 / 7.0).abs() < 1e-12);
    assert_eq!(report["decisions"][0]["reason"], "recent");

    assert!(!dir.path().join("archive").exists());
}

#[tokio::test]
async fn test_curate_then_restore() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path()).await;
    let store = FsSnapshotStore::new(dir.path());

    let out = curate_bin(&["curate", "--recent", "5", "--window-hours", "24"], dir.path());
    assert!(out.status.success());
    assert_eq!(store.list_archived().await.unwrap().len(), 2);
    assert_eq!(store.list().await.unwrap().len(), 5);

    let out = curate_bin(&["restore", "--json"], dir.path());
    assert!(out.status.success());

    let restored: Vec<String> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(restored.len(), 2);
    assert!(store.list_archived().await.unwrap().is_empty());
    assert_eq!(store.list().await.unwrap().len(), 7);
}
