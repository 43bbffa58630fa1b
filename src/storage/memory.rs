//! In-memory storage backend.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{Collection, CollectionDraft, Reel, ReelUpdate};
use crate::storage::{CollectionStore, ReelStore, VaultData};

/// Process-local vault. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<VaultData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing data.
    pub fn with_data(data: VaultData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> VaultData {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl ReelStore for MemoryStore {
    async fn exists_by_url(&self, url: &str) -> Result<bool> {
        Ok(self.data.read().await.exists_by_url(url))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.data.read().await.reels.len())
    }

    async fn insert(&self, reel: Reel) -> Result<()> {
        self.data.write().await.insert_reel(reel)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Reel>> {
        Ok(self.data.read().await.get_reel(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Reel>> {
        Ok(self.data.read().await.reels.clone())
    }

    async fn update(&self, id: &str, update: &ReelUpdate) -> Result<Reel> {
        self.data.write().await.update_reel(id, update)
    }

    async fn move_to_collection(
        &self,
        ids: &[String],
        collection_id: Option<u64>,
    ) -> Result<usize> {
        self.data.write().await.move_reels(ids, collection_id)
    }

    async fn delete(&self, ids: &[String]) -> Result<usize> {
        Ok(self.data.write().await.delete_reels(ids))
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn create_collection(&self, draft: CollectionDraft) -> Result<Collection> {
        Ok(self.data.write().await.create_collection(draft))
    }

    async fn get_collection(&self, id: u64) -> Result<Option<Collection>> {
        Ok(self.data.read().await.get_collection(id))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.data.read().await.list_collections())
    }

    async fn collection_count(&self) -> Result<usize> {
        Ok(self.data.read().await.collections.len())
    }

    async fn update_collection(&self, id: u64, draft: CollectionDraft) -> Result<Collection> {
        self.data.write().await.update_collection(id, draft)
    }

    async fn delete_collection(&self, id: u64) -> Result<usize> {
        self.data.write().await.delete_collection(id)
    }
}
