//! Snapshot storage seam
//!
//! The pipeline writes snapshots through this trait and the curation engine
//! reads and relocates them through it. Implementations only ever expose the
//! active area in [`SnapshotStore::list`]; archived snapshots are invisible to
//! curation, which is what makes repeated curation runs idempotent.
//!
//! Implementations are not expected to coordinate concurrent curation runs:
//! callers serialize curation per store.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::snapshot::Snapshot;

/// One document found in the active area of a store
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    /// Store-specific identifier (the file name for file stores)
    pub id: String,
    /// Parsed document, or the reason it could not be parsed
    pub content: std::result::Result<Snapshot, String>,
}

/// Trait for snapshot storage backends
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist a new snapshot, returning its identifier
    async fn write(&self, snapshot: &Snapshot) -> Result<String, StoreError>;

    /// List active snapshots in a stable discovery order
    async fn list(&self) -> Result<Vec<SnapshotEntry>, StoreError>;

    /// Move an active snapshot into the archive area
    async fn archive(&self, id: &str) -> Result<(), StoreError>;

    /// Identifiers of archived snapshots
    async fn list_archived(&self) -> Result<Vec<String>, StoreError>;

    /// Move an archived snapshot back into the active area
    async fn restore(&self, id: &str) -> Result<(), StoreError>;
}
