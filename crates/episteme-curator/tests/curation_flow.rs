//! Curation against a real snapshot directory

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use episteme_common::{Dimension, Snapshot, SnapshotStore, StoreError, VectorSet};
use episteme_curator::{CurationEngine, CurationPolicy, FsSnapshotStore, Reason};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 18, 0, 0).unwrap()
}

fn snapshot(at: DateTime<Utc>, impact: f64, completion: f64) -> Snapshot {
    let vectors = VectorSet::new()
        .with(Dimension::Impact, impact)
        .with(Dimension::Completion, completion);
    Snapshot::new(at, vectors, json!({ "note": "test" }))
}

async fn seed(store: &FsSnapshotStore, snapshots: &[Snapshot]) {
    for s in snapshots {
        store.write(s).await.unwrap();
    }
}

/// Five recent low-impact snapshots plus two older ones overshadowed within the window
fn seven() -> Vec<Snapshot> {
    let t = base();
    let mut out: Vec<_> = (0..5)
        .map(|h| snapshot(t - Duration::hours(h), 0.3, 0.1))
        .collect();
    out.push(snapshot(t - Duration::hours(5), 0.1, 0.1));
    out.push(snapshot(t - Duration::hours(6), 0.2, 0.1));
    out
}

#[tokio::test]
async fn test_seven_snapshots_keep_five() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path());
    seed(&store, &seven()).await;

    let report = CurationEngine::default().curate(&store, false).await.unwrap();

    assert_eq!(report.total, 7);
    assert_eq!(report.kept, 5);
    assert_eq!(report.archived, 2);
    assert!((report.retention_rate - 5.0 / 7.0).abs() < 1e-12);
    assert!(report.decisions[..5].iter().all(|d| d.reason == Reason::Recent));

    assert_eq!(store.list().await.unwrap().len(), 5);
    assert_eq!(store.list_archived().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path());
    seed(&store, &seven()).await;

    let engine = CurationEngine::default();
    engine.curate(&store, false).await.unwrap();
    let archived_once = store.list_archived().await.unwrap();

    let second = engine.curate(&store, false).await.unwrap();
    assert_eq!(second.total, 5);
    assert_eq!(second.archived, 0);
    assert_eq!(second.retention_rate, 1.0);
    assert_eq!(store.list_archived().await.unwrap(), archived_once);
}

/// Seven equal low-impact snapshots `gap` apart, newest first
fn uniform(gap: Duration) -> Vec<Snapshot> {
    let t = base();
    (0..7).map(|i| snapshot(t - gap * i, 0.1, 0.0)).collect()
}

async fn assert_uniform_all_kept(gap: Duration) {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path());
    seed(&store, &uniform(gap)).await;

    let report = CurationEngine::default().curate(&store, false).await.unwrap();
    let reasons: Vec<_> = report.decisions.iter().map(|d| d.reason).collect();

    assert_eq!(report.total, 7);
    assert_eq!(report.kept, 7);
    assert_eq!(report.archived, 0);
    assert_eq!(report.retention_rate, 1.0);
    assert_eq!(reasons[..5], [Reason::Recent; 5]);
    assert_eq!(reasons[5..], [Reason::BestOfDay; 2]);
    assert!(store.list_archived().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_equal_impacts_keep_everything() {
    // Tied maxima within a window are all kept
    assert_uniform_all_kept(Duration::hours(1)).await;
}

#[tokio::test]
async fn test_equal_impacts_spread_over_days_keep_everything() {
    // Each older snapshot is alone in its window
    assert_uniform_all_kept(Duration::hours(48)).await;
}

#[tokio::test]
async fn test_high_impact_pair_keeps_only_the_stronger() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    let t = base();
    let old = t - Duration::days(3);
    let mut snapshots: Vec<_> = (0..5)
        .map(|h| snapshot(t - Duration::hours(h), 0.1, 0.0))
        .collect();
    snapshots.push(snapshot(old, 0.4, 0.0));
    snapshots.push(snapshot(old + Duration::hours(1), 0.8, 0.0));
    seed(&store, &snapshots).await;

    let report = CurationEngine::default().curate(&store, false).await.unwrap();
    let older = &report.decisions[5..];

    assert!((older[0].impact - 0.8).abs() < 1e-9);
    assert_eq!(older[0].reason, Reason::HighImpact);
    assert!((older[1].impact - 0.4).abs() < 1e-9);
    assert_eq!(older[1].reason, Reason::Archive);
    assert_eq!(store.list_archived().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_dry_run_moves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path());
    seed(&store, &seven()).await;

    let report = CurationEngine::default().curate(&store, true).await.unwrap();
    assert!(report.dry_run);
    assert_eq!(report.archived, 2);
    assert_eq!(store.list().await.unwrap().len(), 7);
    assert!(!dir.path().join("archive").exists());
}

#[tokio::test]
async fn test_best_of_window_beats_its_neighbour() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    let t = base();
    let old = t - Duration::days(3);
    let mut snapshots: Vec<_> = (0..5)
        .map(|h| snapshot(t - Duration::hours(h), 0.1, 0.0))
        .collect();
    snapshots.push(snapshot(old, 0.4, 0.0));
    snapshots.push(snapshot(old + Duration::hours(1), 0.65, 0.0));
    seed(&store, &snapshots).await;

    let report = CurationEngine::default().curate(&store, true).await.unwrap();
    let older: Vec<_> = report.decisions[5..].iter().collect();

    assert!((older[0].impact - 0.65).abs() < 1e-9);
    assert_eq!(older[0].reason, Reason::BestOfDay);
    assert!((older[1].impact - 0.4).abs() < 1e-9);
    assert_eq!(older[1].reason, Reason::Archive);
}

#[tokio::test]
async fn test_dashed_and_colon_timestamps_mix() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("snapshot_a.json"),
        json!({ "timestamp": "2024-06-10T12-00-00", "vectors": { "impact": 0.2 } }).to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("snapshot_b.json"),
        json!({ "timestamp": "2024-06-10T13:00:00", "vectors": { "impact": 0.1 } }).to_string(),
    )
    .unwrap();

    let store = FsSnapshotStore::new(dir.path());
    let engine = CurationEngine::new(CurationPolicy::default().with_recent_count(0));
    let report = engine.curate(&store, true).await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.decisions[0].id, "snapshot_b.json");
    assert_eq!(report.decisions[0].reason, Reason::Archive);
    assert_eq!(report.decisions[1].reason, Reason::BestOfDay);
}

#[tokio::test]
async fn test_malformed_files_reported_not_curated() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path());
    seed(&store, &seven()[..2]).await;
    std::fs::write(dir.path().join("snapshot_garbage.json"), "not json").unwrap();
    std::fs::write(
        dir.path().join("snapshot_undated.json"),
        json!({ "vectors": { "impact": 0.9 } }).to_string(),
    )
    .unwrap();

    let report = CurationEngine::default().curate(&store, false).await.unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.skipped.len(), 2);
    assert!(dir.path().join("snapshot_garbage.json").exists());
}

#[tokio::test]
async fn test_missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path().join("absent"));

    let err = CurationEngine::default().curate(&store, true).await.unwrap_err();
    assert!(matches!(err, StoreError::DirectoryNotFound(_)));
}

#[tokio::test]
async fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    let report = CurationEngine::default().curate(&store, false).await.unwrap();
    assert_eq!(report.total, 0);
    assert_eq!(report.retention_rate, 0.0);
}
