//! Flat-file snapshot store
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   snapshot_2024-06-01T12-00-00.000000.json   active
//!   ...
//!   archive/
//!     snapshot_2024-05-02T09-15-00.000000.json archived
//! ```
//!
//! Only `<prefix>*.json` files directly under the root are active. Archiving
//! is a rename into the archive directory; nothing is ever deleted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use episteme_common::{Snapshot, SnapshotEntry, SnapshotStore, StoreError};

use crate::policy::CurationPolicy;
use crate::timestamp;

/// Attempts at a unique file name when two snapshots share a timestamp
const MAX_NAME_ATTEMPTS: usize = 100;

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Snapshot store backed by a directory of JSON files
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
    archive_dir: PathBuf,
    prefix: String,
}

impl FsSnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_policy(root, &CurationPolicy::default())
    }

    /// Store using the policy's archive directory name and file prefix
    pub fn with_policy(root: impl Into<PathBuf>, policy: &CurationPolicy) -> Self {
        let root = root.into();
        Self {
            archive_dir: root.join(&policy.archive_dir),
            root,
            prefix: policy.file_prefix.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    async fn ensure_root(&self) -> Result<(), StoreError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::DirectoryNotFound(self.root.clone())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::DirectoryNotFound(self.root.clone()))
            }
            Err(e) => Err(io_err(&self.root, e)),
        }
    }

    fn is_snapshot_name(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) && name.ends_with(".json")
    }

    /// Ids are bare file names; anything path-like is rejected
    fn checked_id<'a>(&self, id: &'a str) -> Result<&'a str, StoreError> {
        let plain = !id.is_empty()
            && Path::new(id).file_name().and_then(|n| n.to_str()) == Some(id)
            && id != "."
            && id != "..";
        if plain {
            Ok(id)
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    async fn json_files(&self, dir: &Path) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let mut reader = tokio::fs::read_dir(dir).await.map_err(|e| io_err(dir, e))?;
        while let Some(item) = reader.next_entry().await.map_err(|e| io_err(dir, e))? {
            let file_type = item.file_type().await.map_err(|e| io_err(&item.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = item.file_name().to_str() {
                if self.is_snapshot_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Move `from` to `to`, refusing to overwrite
    async fn relocate(&self, id: &str, from: &Path, to: &Path) -> Result<(), StoreError> {
        if tokio::fs::try_exists(to).await.map_err(|e| io_err(to, e))? {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        match tokio::fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(io_err(from, e)),
        }
    }

    /// Move every archived snapshot back; returns the restored ids
    pub async fn restore_all(&self) -> Result<Vec<String>, StoreError> {
        let ids = self.list_archived().await?;
        for id in &ids {
            self.restore(id).await?;
        }
        Ok(ids)
    }
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    #[instrument(skip(self, snapshot), fields(root = %self.root.display()))]
    async fn write(&self, snapshot: &Snapshot) -> Result<String, StoreError> {
        self.ensure_root().await?;

        let at = snapshot
            .timestamp
            .as_deref()
            .and_then(timestamp::parse)
            .unwrap_or_else(Utc::now);
        let base = timestamp::file_name_for(at, &self.prefix);
        let body = serde_json::to_vec_pretty(snapshot)?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                base.clone()
            } else {
                format!("{}_{}.json", base.trim_end_matches(".json"), attempt)
            };
            let path = self.root.join(&name);

            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            let mut file = match file {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(io_err(&path, e)),
            };
            file.write_all(&body).await.map_err(|e| io_err(&path, e))?;
            file.flush().await.map_err(|e| io_err(&path, e))?;

            debug!(id = %name, "Wrote snapshot");
            return Ok(name);
        }

        Err(StoreError::AlreadyExists(base))
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn list(&self) -> Result<Vec<SnapshotEntry>, StoreError> {
        self.ensure_root().await?;

        let mut entries = Vec::new();
        for name in self.json_files(&self.root).await? {
            let path = self.root.join(&name);
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(text) => serde_json::from_str::<Snapshot>(&text).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            entries.push(SnapshotEntry { id: name, content });
        }
        debug!(count = entries.len(), "Listed active snapshots");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn archive(&self, id: &str) -> Result<(), StoreError> {
        let id = self.checked_id(id)?;
        tokio::fs::create_dir_all(&self.archive_dir)
            .await
            .map_err(|e| io_err(&self.archive_dir, e))?;
        self.relocate(id, &self.root.join(id), &self.archive_dir.join(id))
            .await
    }

    async fn list_archived(&self) -> Result<Vec<String>, StoreError> {
        self.ensure_root().await?;
        match tokio::fs::metadata(&self.archive_dir).await {
            Ok(meta) if meta.is_dir() => self.json_files(&self.archive_dir).await,
            Ok(_) => Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(io_err(&self.archive_dir, e)),
        }
    }

    #[instrument(skip(self))]
    async fn restore(&self, id: &str) -> Result<(), StoreError> {
        let id = self.checked_id(id)?;
        self.relocate(id, &self.archive_dir.join(id), &self.root.join(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use episteme_common::VectorSet;

    fn snapshot(hour: u32) -> Snapshot {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap();
        Snapshot::new(at, VectorSet::new(), serde_json::json!({ "hour": hour }))
    }

    #[tokio::test]
    async fn test_write_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path());

        let id = store.write(&snapshot(9)).await.unwrap();
        assert_eq!(id, "snapshot_2024-06-01T09-00-00.000000.json");

        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content.as_ref().unwrap(), &snapshot(9));
    }

    #[tokio::test]
    async fn test_same_timestamp_gets_unique_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path());

        let a = store.write(&snapshot(9)).await.unwrap();
        let b = store.write(&snapshot(9)).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        std::fs::write(dir.path().join("other.json"), "{}").unwrap();
        std::fs::write(dir.path().join("snapshot_broken.json"), "{ nope").unwrap();

        let store = FsSnapshotStore::new(dir.path());
        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].content.is_err());
    }

    #[tokio::test]
    async fn test_archive_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path());
        let id = store.write(&snapshot(10)).await.unwrap();

        store.archive(&id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.list_archived().await.unwrap(), vec![id.clone()]);
        assert!(dir.path().join("archive").join(&id).exists());

        let restored = store.restore_all().await.unwrap();
        assert_eq!(restored, vec![id]);
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.list_archived().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path().join("nope"));
        assert!(matches!(
            store.list().await,
            Err(StoreError::DirectoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_path_like_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path());
        assert!(matches!(
            store.archive("../snapshot_x.json").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.archive("snapshot_missing.json").await,
            Err(StoreError::NotFound(_))
        ));
    }
}
