//! Snapshots written by the middleware, curated from disk

use std::sync::Arc;

use episteme_common::SnapshotStore;
use episteme_curator::{CurationEngine, FsSnapshotStore, Reason};
use episteme_sidecar::{Arguments, EpistemicMiddleware, OperationOutput, PipelineConfig};

#[tokio::test]
async fn test_pipeline_snapshots_are_curatable() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FsSnapshotStore::new(dir.path()));

    let config = PipelineConfig {
        snapshot_every: 1,
        ..Default::default()
    };
    let middleware = EpistemicMiddleware::builder(config)
        .snapshot_store(store.clone())
        .build()
        .unwrap();

    for _ in 0..3 {
        middleware
            .handle("read_file", Arguments::new(), |_, _| async {
                Ok(OperationOutput::text("contents"))
            })
            .await;
    }

    let entries = store.list().await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.content.is_ok()));

    let report = CurationEngine::default().curate(store.as_ref(), false).await.unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.kept, 3);
    assert!(report.decisions.iter().all(|d| d.reason == Reason::Recent));
    assert!(report.skipped.is_empty());
}
