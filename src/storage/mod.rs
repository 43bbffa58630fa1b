//! Storage abstractions for the reel vault.
//!
//! Two backends share one in-memory representation ([`VaultData`]):
//! - [`MemoryStore`]: process-local, used by tests and dry runs
//! - [`LocalStorage`]: a single JSON document on disk
//!
//! ## File Layout
//!
//! ```text
//! vault.json
//! ├── updated_at            # Last write time (RFC 3339)
//! ├── next_collection_id    # Id counter for new collections
//! ├── reels[]               # Saved reels, insertion order
//! └── collections[]         # Collections, creation order
//! ```
//!
//! Both backends reject a second reel with an already stored URL inside
//! `insert`, under the same lock as the write, and report it as
//! [`AppError::Duplicate`].

pub mod local;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Collection, CollectionDraft, Reel, ReelUpdate};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStore;

/// Persistence for saved reels.
#[async_trait]
pub trait ReelStore: Send + Sync {
    /// Whether a reel with this normalized URL is stored.
    async fn exists_by_url(&self, url: &str) -> Result<bool>;

    /// Number of stored reels.
    async fn count(&self) -> Result<usize>;

    /// Store a new reel. Fails with [`AppError::Duplicate`] if its URL is
    /// already present.
    async fn insert(&self, reel: Reel) -> Result<()>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Reel>>;

    /// All reels in insertion order.
    async fn list(&self) -> Result<Vec<Reel>>;

    /// Apply user edits to one reel and return the result.
    async fn update(&self, id: &str, update: &ReelUpdate) -> Result<Reel>;

    /// Assign reels to a collection (or none). All ids must exist; nothing
    /// changes otherwise.
    async fn move_to_collection(&self, ids: &[String], collection_id: Option<u64>)
    -> Result<usize>;

    /// Delete reels by id, returning how many were removed.
    async fn delete(&self, ids: &[String]) -> Result<usize>;
}

/// Persistence for collections.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn create_collection(&self, draft: CollectionDraft) -> Result<Collection>;

    /// Collection with its current item count.
    async fn get_collection(&self, id: u64) -> Result<Option<Collection>>;

    /// All collections with item counts, in creation order.
    async fn list_collections(&self) -> Result<Vec<Collection>>;

    async fn collection_count(&self) -> Result<usize>;

    async fn update_collection(&self, id: u64, draft: CollectionDraft) -> Result<Collection>;

    /// Delete a collection and uncategorize its reels. Returns how many reels
    /// were uncategorized.
    async fn delete_collection(&self, id: u64) -> Result<usize>;
}

/// Whole vault state as held in memory and written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultData {
    pub updated_at: DateTime<Utc>,
    #[serde(default = "first_collection_id")]
    pub next_collection_id: u64,
    #[serde(default)]
    pub reels: Vec<Reel>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

fn first_collection_id() -> u64 {
    1
}

impl Default for VaultData {
    fn default() -> Self {
        Self {
            updated_at: Utc::now(),
            next_collection_id: first_collection_id(),
            reels: Vec::new(),
            collections: Vec::new(),
        }
    }
}

impl VaultData {
    pub fn exists_by_url(&self, url: &str) -> bool {
        self.reels.iter().any(|r| r.url == url)
    }

    pub fn get_reel(&self, id: &str) -> Option<&Reel> {
        self.reels.iter().find(|r| r.id == id)
    }

    pub fn insert_reel(&mut self, reel: Reel) -> Result<()> {
        if self.exists_by_url(&reel.url) {
            return Err(AppError::Duplicate(reel.url));
        }
        if self.get_reel(&reel.id).is_some() {
            return Err(AppError::store(format!("Reel id {} already in use", reel.id)));
        }
        if let Some(collection_id) = reel.collection_id {
            self.require_collection(collection_id)?;
        }
        self.reels.push(reel);
        self.touch();
        Ok(())
    }

    pub fn update_reel(&mut self, id: &str, update: &ReelUpdate) -> Result<Reel> {
        if let Some(Some(collection_id)) = update.collection_id {
            self.require_collection(collection_id)?;
        }
        let reel = self
            .reels
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("Reel", id))?;
        update.apply(reel);
        let updated = reel.clone();
        self.touch();
        Ok(updated)
    }

    pub fn move_reels(&mut self, ids: &[String], collection_id: Option<u64>) -> Result<usize> {
        if let Some(collection_id) = collection_id {
            self.require_collection(collection_id)?;
        }
        if let Some(missing) = ids.iter().find(|id| self.get_reel(id).is_none()) {
            return Err(AppError::not_found("Reel", missing));
        }

        let mut moved = 0;
        for reel in self.reels.iter_mut().filter(|r| ids.contains(&r.id)) {
            reel.collection_id = collection_id;
            moved += 1;
        }
        self.touch();
        Ok(moved)
    }

    pub fn delete_reels(&mut self, ids: &[String]) -> usize {
        let before = self.reels.len();
        self.reels.retain(|r| !ids.contains(&r.id));
        let removed = before - self.reels.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn create_collection(&mut self, draft: CollectionDraft) -> Collection {
        let collection = Collection {
            id: self.next_collection_id,
            name: draft.name,
            color: draft.color,
            icon: draft.icon,
            item_count: 0,
        };
        self.next_collection_id += 1;
        self.collections.push(collection.clone());
        self.touch();
        collection
    }

    pub fn get_collection(&self, id: u64) -> Option<Collection> {
        self.collections
            .iter()
            .find(|c| c.id == id)
            .map(|c| self.with_count(c))
    }

    pub fn list_collections(&self) -> Vec<Collection> {
        self.collections.iter().map(|c| self.with_count(c)).collect()
    }

    pub fn update_collection(&mut self, id: u64, draft: CollectionDraft) -> Result<Collection> {
        let collection = self
            .collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Collection", id))?;
        collection.name = draft.name;
        collection.color = draft.color;
        collection.icon = draft.icon;
        let updated = collection.clone();
        self.touch();
        Ok(self.with_count(&updated))
    }

    pub fn delete_collection(&mut self, id: u64) -> Result<usize> {
        self.require_collection(id)?;
        self.collections.retain(|c| c.id != id);

        let mut uncategorized = 0;
        for reel in self.reels.iter_mut().filter(|r| r.collection_id == Some(id)) {
            reel.collection_id = None;
            uncategorized += 1;
        }
        self.touch();
        Ok(uncategorized)
    }

    fn require_collection(&self, id: u64) -> Result<()> {
        if self.collections.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(AppError::not_found("Collection", id))
        }
    }

    fn with_count(&self, collection: &Collection) -> Collection {
        Collection {
            item_count: self
                .reels
                .iter()
                .filter(|r| r.collection_id == Some(collection.id))
                .count(),
            ..collection.clone()
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
