//! JSON file storage implementation.
//!
//! Each collection is one pretty-printed JSON array under the storage root
//! (`team.json`, `tasks.json`). Saves go to `<key>.json.tmp` and are renamed
//! into place on commit. Small per-collection meta markers
//! (version + updated_at) live under `meta/`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crewplan_core::{Task, Worker};
use super::{Storage, StorageError, Result, TEAM_KEY, TASKS_KEY};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    staged: Arc<Mutex<BTreeSet<String>>>,
}

impl JsonStorage {
    /// Create storage, creating the root and `meta/` directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self {
            root,
            staged: Arc::new(Mutex::new(BTreeSet::new())),
        })
    }

    /// Open storage that must already exist.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        match fs::metadata(root).await {
            Ok(meta) if meta.is_dir() => Self::new(root).await,
            Ok(_) => Err(StorageError::Other(format!("{} is not a directory", root.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(root.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn staged_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json.tmp", key))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join("meta").join(format!("{}.meta.json", key))
    }

    /// Whether there are saves not yet committed.
    pub async fn is_pending(&self) -> bool {
        !self.staged.lock().await.is_empty()
    }

    /// Current version of a collection (0 if never committed).
    pub async fn version(&self, key: &str) -> Result<u64> {
        Ok(read_version(&self.meta_path(key)).await)
    }

    /// Read and increment per-collection version, return new version.
    async fn bump_version(&self, key: &str) -> Result<u64> {
        let path = self.meta_path(key);
        let version = read_version(&path).await + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    /// Path a load should read: the staged copy if there is one.
    async fn read_path(&self, key: &str) -> PathBuf {
        if self.staged.lock().await.contains(key) {
            self.staged_path(key)
        } else {
            self.collection_path(key)
        }
    }

    async fn stage_collection<T: serde::Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        fs::write(self.staged_path(key), json.as_bytes()).await?;

        self.staged.lock().await.insert(key.to_string());
        debug!("Staged {} {}", items.len(), key);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load_workers(&self) -> Result<Vec<Worker>> {
        read_collection(&self.read_path(TEAM_KEY).await).await
    }

    async fn save_workers(&mut self, workers: &[Worker]) -> Result<()> {
        self.stage_collection(TEAM_KEY, workers).await
    }

    async fn load_tasks(&self) -> Result<Vec<Task>> {
        read_collection(&self.read_path(TASKS_KEY).await).await
    }

    async fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        self.stage_collection(TASKS_KEY, tasks).await
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        let mut staged = self.staged.lock().await;
        let mut installed = Vec::with_capacity(staged.len());

        // A rename replaces the whole file at once, so a reader never sees half an array
        while let Some(key) = staged.pop_first() {
            if let Err(e) = fs::rename(self.staged_path(&key), self.collection_path(&key)).await {
                staged.insert(key);
                return Err(e.into());
            }
            installed.push(key);
        }
        drop(staged);

        // The data is in place; a stale marker is not worth failing the commit over
        for key in &installed {
            match self.bump_version(key).await {
                Ok(version) => debug!("Installed {} (v{})", key, version),
                Err(e) => warn!("Failed to update meta marker for {}: {}", key, e),
            }
        }
        debug!("Committed: {}", message);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        let staged = std::mem::take(&mut *self.staged.lock().await);
        for key in &staged {
            match fs::remove_file(self.staged_path(key)).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        debug!("Rolled back {} staged collection(s)", staged.len());
        Ok(())
    }
}

async fn read_collection<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn read_version(path: &Path) -> u64 {
    match fs::read_to_string(path).await {
        Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
            .ok()
            .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewplan_core::{Priority, WorkerId};

    #[tokio::test]
    async fn test_missing_collections_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        assert!(storage.load_workers().await.unwrap().is_empty());
        assert!(storage.load_tasks().await.unwrap().is_empty());
        assert_eq!(storage.version(TEAM_KEY).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_and_load_collections() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let worker = Worker::new("Sarah", "Frontend", ["React"], 3);
        let mut task = Task::new("Dashboard", "Main view", ["React"], Priority::High);
        task.assigned_to = Some(worker.id);

        storage.save_workers(&[worker.clone()]).await.unwrap();
        storage.save_tasks(&[task.clone()]).await.unwrap();
        assert!(storage.is_pending().await);

        // Staged saves are visible to this handle only
        assert_eq!(storage.load_workers().await.unwrap(), vec![worker.clone()]);
        let other = JsonStorage::open(dir.path()).await.unwrap();
        assert!(other.load_workers().await.unwrap().is_empty());

        storage.commit("Save roster").await.unwrap();
        assert!(!storage.is_pending().await);
        assert!(!dir.path().join("team.json.tmp").exists());

        // A fresh handle sees the same data
        let reopened = JsonStorage::open(dir.path()).await.unwrap();
        assert_eq!(reopened.load_workers().await.unwrap(), vec![worker]);
        assert_eq!(reopened.load_tasks().await.unwrap(), vec![task]);
    }

    #[tokio::test]
    async fn test_versions_bump_per_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        storage.save_workers(&[]).await.unwrap();
        storage.commit("first").await.unwrap();
        storage.save_workers(&[]).await.unwrap();
        storage.save_tasks(&[]).await.unwrap();
        storage.commit("second").await.unwrap();

        assert_eq!(storage.version(TEAM_KEY).await.unwrap(), 2);
        assert_eq!(storage.version(TASKS_KEY).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_persisted_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let owner = WorkerId::new();
        let mut task = Task::new("API", "", ["Node.js"], Priority::Medium);
        task.assigned_to = Some(owner);
        storage.save_tasks(&[task]).await.unwrap();
        storage.commit("Save tasks").await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["assignedTo"], owner.to_string());
        assert_eq!(json[0]["completed"], false);
    }

    #[tokio::test]
    async fn test_rollback_keeps_committed_pair() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let worker = Worker::new("Marcus", "Backend", ["Node.js"], 2);
        let task = Task::new("API", "", ["Node.js"], Priority::High);
        storage.save_workers(&[worker.clone()]).await.unwrap();
        storage.save_tasks(&[task.clone()]).await.unwrap();
        storage.commit("Initial").await.unwrap();

        storage.save_workers(&[]).await.unwrap();
        storage.rollback().await.unwrap();

        assert!(!storage.is_pending().await);
        assert!(!dir.path().join("team.json.tmp").exists());
        assert_eq!(storage.load_workers().await.unwrap(), vec![worker]);
        assert_eq!(storage.load_tasks().await.unwrap(), vec![task]);
        assert_eq!(storage.version(TEAM_KEY).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_survives_unwritable_meta() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        std::fs::remove_dir(dir.path().join("meta")).unwrap();

        let worker = Worker::new("Emily", "Design", ["Figma"], 1);
        storage.save_workers(&[worker.clone()]).await.unwrap();
        storage.commit("Save team").await.unwrap();

        let reopened = JsonStorage::open(dir.path()).await.unwrap();
        assert_eq!(reopened.load_workers().await.unwrap(), vec![worker]);
    }

    #[tokio::test]
    async fn test_open_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonStorage::open(dir.path().join("absent")).await.err().unwrap();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("team.json"), "{not json").unwrap();

        assert!(matches!(storage.load_workers().await, Err(StorageError::Json(_))));
    }
}
