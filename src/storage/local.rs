//! Local filesystem storage implementation.
//!
//! Keeps the whole vault in memory and rewrites one JSON file after every
//! mutation. Writes go to a temp file that is renamed over the target, so a
//! crash leaves either the old or the new vault on disk.
//!
//! A mutation is applied to a copy of the state and only becomes visible once
//! the file write succeeded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{Collection, CollectionDraft, Reel, ReelUpdate};
use crate::storage::{CollectionStore, ReelStore, VaultData};

/// JSON-file storage backend.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    data: Mutex<VaultData>,
}

impl LocalStorage {
    /// Open the vault file at `path`, starting empty if it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match read_json::<VaultData>(&path).await? {
            Some(data) => {
                log::debug!(
                    "Loaded {} reels and {} collections from {}",
                    data.reels.len(),
                    data.collections.len(),
                    path.display()
                );
                data
            }
            None => {
                log::info!("No vault at {}, starting empty", path.display());
                VaultData::default()
            }
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` on a copy of the state, persist it, then publish it.
    async fn mutate<T>(&self, op: impl FnOnce(&mut VaultData) -> Result<T>) -> Result<T> {
        let mut guard = self.data.lock().await;
        let mut next = guard.clone();
        let value = op(&mut next)?;
        write_json(&self.path, &next).await?;
        *guard = next;
        Ok(value)
    }

    async fn read<T>(&self, op: impl FnOnce(&VaultData) -> T) -> T {
        let guard = self.data.lock().await;
        op(&guard)
    }
}

/// Ensure parent directory exists.
async fn ensure_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Write bytes atomically (write to temp, then rename).
async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_dir(path).await?;

    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_bytes(path, &bytes).await
}

/// Read bytes, returning None if file doesn't exist.
async fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match read_bytes(path).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

#[async_trait]
impl ReelStore for LocalStorage {
    async fn exists_by_url(&self, url: &str) -> Result<bool> {
        Ok(self.read(|d| d.exists_by_url(url)).await)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read(|d| d.reels.len()).await)
    }

    async fn insert(&self, reel: Reel) -> Result<()> {
        self.mutate(|d| d.insert_reel(reel)).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Reel>> {
        Ok(self.read(|d| d.get_reel(id).cloned()).await)
    }

    async fn list(&self) -> Result<Vec<Reel>> {
        Ok(self.read(|d| d.reels.clone()).await)
    }

    async fn update(&self, id: &str, update: &ReelUpdate) -> Result<Reel> {
        self.mutate(|d| d.update_reel(id, update)).await
    }

    async fn move_to_collection(
        &self,
        ids: &[String],
        collection_id: Option<u64>,
    ) -> Result<usize> {
        self.mutate(|d| d.move_reels(ids, collection_id)).await
    }

    async fn delete(&self, ids: &[String]) -> Result<usize> {
        self.mutate(|d| Ok(d.delete_reels(ids))).await
    }
}

#[async_trait]
impl CollectionStore for LocalStorage {
    async fn create_collection(&self, draft: CollectionDraft) -> Result<Collection> {
        self.mutate(|d| Ok(d.create_collection(draft))).await
    }

    async fn get_collection(&self, id: u64) -> Result<Option<Collection>> {
        Ok(self.read(|d| d.get_collection(id)).await)
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.read(|d| d.list_collections()).await)
    }

    async fn collection_count(&self) -> Result<usize> {
        Ok(self.read(|d| d.collections.len()).await)
    }

    async fn update_collection(&self, id: u64, draft: CollectionDraft) -> Result<Collection> {
        self.mutate(|d| d.update_collection(id, draft)).await
    }

    async fn delete_collection(&self, id: u64) -> Result<usize> {
        self.mutate(|d| d.delete_collection(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn reel(id: &str, url: &str) -> Reel {
        Reel {
            id: id.to_string(),
            url: url.to_string(),
            title: "Title".to_string(),
            thumbnail: "https://cdn.example.com/t.jpg".to_string(),
            tags: vec!["YouTube".to_string(), "Shorts".to_string()],
            created_at: 1_767_225_600_000,
            collection_id: None,
            notes: Some("note".to_string()),
        }
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::open(tmp.path().join("vault.json"))
            .await
            .unwrap();

        assert_eq!(storage.count().await.unwrap(), 0);
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/vault.json");

        {
            let storage = LocalStorage::open(&path).await.unwrap();
            let c = storage
                .create_collection(CollectionDraft::new("Gym", "#FF6B9D", "💪"))
                .await
                .unwrap();
            storage
                .insert(reel("a", "https://youtube.com/shorts/abc"))
                .await
                .unwrap();
            storage
                .move_to_collection(&["a".to_string()], Some(c.id))
                .await
                .unwrap();
        }

        let reopened = LocalStorage::open(&path).await.unwrap();
        let loaded = reopened.get_by_id("a").await.unwrap().unwrap();
        assert_eq!(loaded.url, "https://youtube.com/shorts/abc");
        assert_eq!(loaded.tags, vec!["YouTube", "Shorts"]);
        assert_eq!(loaded.created_at, 1_767_225_600_000);
        assert_eq!(loaded.collection_id, Some(1));

        let collections = reopened.list_collections().await.unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].item_count, 1);

        let next = reopened
            .create_collection(CollectionDraft::new("Food", "#fff", "🍜"))
            .await
            .unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_unchanged() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::open(tmp.path().join("vault.json"))
            .await
            .unwrap();
        storage.insert(reel("a", "https://x.com/1")).await.unwrap();

        let err = storage.insert(reel("b", "https://x.com/1")).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
        assert_eq!(storage.count().await.unwrap(), 1);

        let reopened = LocalStorage::open(storage.path()).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vault.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let err = LocalStorage::open(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vault.json");
        let storage = LocalStorage::open(&path).await.unwrap();
        storage.insert(reel("a", "https://x.com/1")).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
