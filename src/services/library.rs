// src/services/library.rs

//! Library management service.
//!
//! Everything a user does with saved reels after the save itself: browsing,
//! editing, moving between collections, deleting, and the tier-limited
//! collection lifecycle.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{Collection, CollectionDraft, Reel, ReelUpdate};
use crate::services::FeaturePolicy;
use crate::storage::{CollectionStore, ReelStore};

/// Which reels to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReelFilter {
    #[default]
    All,
    Collection(u64),
    Uncategorized,
}

/// A [`ReelFilter`] narrowed by text, tags and platform.
///
/// Blank search and platform strings match everything. `tags` matches a reel
/// carrying any of the listed tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReelQuery {
    pub scope: ReelFilter,
    /// Case-insensitive substring of the title or of any tag
    pub search: Option<String>,
    pub tags: Vec<String>,
    /// Case-insensitive substring of the URL, e.g. `tiktok`
    pub platform: Option<String>,
}

impl ReelQuery {
    pub fn new(scope: ReelFilter) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn matches(&self, reel: &Reel) -> bool {
        let in_scope = match self.scope {
            ReelFilter::All => true,
            ReelFilter::Collection(id) => reel.collection_id == Some(id),
            ReelFilter::Uncategorized => reel.collection_id.is_none(),
        };

        let matches_search = non_blank(&self.search).is_none_or(|needle| {
            contains_ignore_case(&reel.title, &needle)
                || reel.tags.iter().any(|tag| contains_ignore_case(tag, &needle))
        });

        let matches_tags = self.tags.is_empty()
            || reel.tags.iter().any(|tag| {
                self.tags
                    .iter()
                    .any(|wanted| wanted.trim().eq_ignore_ascii_case(tag))
            });

        let matches_platform = non_blank(&self.platform)
            .is_none_or(|platform| contains_ignore_case(&reel.url, &platform));

        in_scope && matches_search && matches_tags && matches_platform
    }
}

impl From<ReelFilter> for ReelQuery {
    fn from(scope: ReelFilter) -> Self {
        Self::new(scope)
    }
}

/// Lowercased, trimmed value if it has any content.
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// `needle` must already be lowercase.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Result of creating a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateCollectionOutcome {
    Success(Collection),
    LimitReached(usize),
    Invalid(String),
    Error(String),
}

impl fmt::Display for CreateCollectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(c) => write!(f, "Created collection {} ({})", c.name, c.id),
            Self::LimitReached(max) => write!(
                f,
                "Collection limit reached ({max}). Upgrade your tier to create more."
            ),
            Self::Invalid(reason) => write!(f, "Invalid collection: {reason}"),
            Self::Error(message) => write!(f, "Could not create collection: {message}"),
        }
    }
}

/// Current usage against the tier limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub reels: usize,
    pub collections: usize,
}

/// Service for browsing and organizing saved reels.
pub struct LibraryService<S> {
    store: Arc<S>,
    policy: FeaturePolicy,
    create_lock: Mutex<()>,
}

impl<S> LibraryService<S>
where
    S: ReelStore + CollectionStore,
{
    pub fn new(store: Arc<S>, policy: FeaturePolicy) -> Self {
        Self {
            store,
            policy,
            create_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> FeaturePolicy {
        self.policy
    }

    /// Reels matching `filter`, newest first.
    pub async fn list_reels(&self, filter: ReelFilter) -> Result<Vec<Reel>> {
        self.search_reels(&ReelQuery::from(filter)).await
    }

    /// Reels matching `query`, newest first.
    pub async fn search_reels(&self, query: &ReelQuery) -> Result<Vec<Reel>> {
        if let ReelFilter::Collection(id) = query.scope {
            self.get_collection(id).await?;
        }

        let mut reels: Vec<Reel> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|reel| query.matches(reel))
            .collect();
        reels.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        log::debug!("{} reel(s) match {:?}", reels.len(), query);
        Ok(reels)
    }

    /// Every tag in use across the vault, sorted.
    pub async fn available_tags(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .flat_map(|reel| reel.tags)
            .collect())
    }

    pub async fn get_reel(&self, id: &str) -> Result<Reel> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Reel", id))
    }

    /// Edit title, notes or collection of a reel.
    pub async fn update_reel(&self, id: &str, mut update: ReelUpdate) -> Result<Reel> {
        if update.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }
        if let Some(title) = update.title.take() {
            let title = title.trim();
            if title.is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
            update.title = Some(title.to_string());
        }
        if matches!(&update.notes, Some(Some(notes)) if notes.trim().is_empty()) {
            update.notes = Some(None);
        }

        let reel = self.store.update(id, &update).await?;
        log::info!("Updated reel {}", id);
        Ok(reel)
    }

    /// Move reels into a collection, or out of any with `None`.
    pub async fn move_reels(&self, ids: &[String], collection_id: Option<u64>) -> Result<usize> {
        if ids.is_empty() {
            return Err(AppError::validation("No reels to move"));
        }
        let moved = self.store.move_to_collection(ids, collection_id).await?;
        match collection_id {
            Some(id) => log::info!("Moved {} reel(s) to collection {}", moved, id),
            None => log::info!("Moved {} reel(s) out of their collections", moved),
        }
        Ok(moved)
    }

    pub async fn delete_reels(&self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Err(AppError::validation("No items to delete"));
        }
        let removed = self.store.delete(ids).await?;
        log::info!("Deleted {} of {} requested reel(s)", removed, ids.len());
        Ok(removed)
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>> {
        self.store.list_collections().await
    }

    /// Create a collection if the tier allows another one.
    pub async fn create_collection(&self, draft: CollectionDraft) -> CreateCollectionOutcome {
        let draft = match draft.validated() {
            Ok(draft) => draft,
            Err(e) => return CreateCollectionOutcome::Invalid(e.to_string()),
        };

        let _guard = self.create_lock.lock().await;
        let result = async {
            let current = self.store.collection_count().await?;
            if !self.policy.can_create_collection(current) {
                let max = self.policy.max_collections().unwrap_or(current);
                return Ok(CreateCollectionOutcome::LimitReached(max));
            }
            let collection = self.store.create_collection(draft).await?;
            log::info!("Created collection {} ({})", collection.name, collection.id);
            Ok::<_, AppError>(CreateCollectionOutcome::Success(collection))
        }
        .await;

        result.unwrap_or_else(|e| {
            log::error!("Failed to create collection: {}", e);
            CreateCollectionOutcome::Error(e.to_string())
        })
    }

    pub async fn update_collection(&self, id: u64, draft: CollectionDraft) -> Result<Collection> {
        let draft = draft.validated()?;
        self.store.update_collection(id, draft).await
    }

    /// Delete a collection. Its reels become uncategorized.
    pub async fn delete_collection(&self, id: u64) -> Result<usize> {
        let uncategorized = self.store.delete_collection(id).await?;
        log::info!(
            "Deleted collection {}, {} reel(s) now uncategorized",
            id,
            uncategorized
        );
        Ok(uncategorized)
    }

    pub async fn usage(&self) -> Result<Usage> {
        Ok(Usage {
            reels: self.store.count().await?,
            collections: self.store.collection_count().await?,
        })
    }

    pub async fn get_collection(&self, id: u64) -> Result<Collection> {
        self.store
            .get_collection(id)
            .await?
            .ok_or_else(|| AppError::not_found("Collection", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;
    use crate::storage::MemoryStore;

    fn reel(id: &str, url: &str, created_at: i64) -> Reel {
        Reel {
            id: id.to_string(),
            url: url.to_string(),
            title: format!("Reel {id}"),
            thumbnail: String::new(),
            tags: vec!["TikTok".to_string()],
            created_at,
            collection_id: None,
            notes: None,
        }
    }

    async fn service(tier: Tier) -> (Arc<MemoryStore>, LibraryService<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.insert(reel("a", "https://tiktok.com/1", 1)).await.unwrap();
        store.insert(reel("b", "https://tiktok.com/2", 2)).await.unwrap();
        let service = LibraryService::new(Arc::clone(&store), FeaturePolicy::new(tier));
        (store, service)
    }

    fn draft(name: &str) -> CollectionDraft {
        CollectionDraft::new(name, "#FF6B9D", "⭐")
    }

    #[tokio::test]
    async fn test_collection_limit_enforced() {
        let (_, service) = service(Tier::Scouter).await;
        for name in ["One", "Two", "Three"] {
            assert!(matches!(
                service.create_collection(draft(name)).await,
                CreateCollectionOutcome::Success(_)
            ));
        }

        let outcome = service.create_collection(draft("Four")).await;
        assert_eq!(outcome, CreateCollectionOutcome::LimitReached(3));
        assert_eq!(service.usage().await.unwrap().collections, 3);
    }

    #[tokio::test]
    async fn test_invalid_collection_draft() {
        let (_, service) = service(Tier::Icon).await;
        let outcome = service
            .create_collection(CollectionDraft::new("Gym", "pink", "x"))
            .await;
        assert!(matches!(outcome, CreateCollectionOutcome::Invalid(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let (_, service) = service(Tier::Icon).await;
        let CreateCollectionOutcome::Success(gym) = service.create_collection(draft("Gym")).await
        else {
            panic!("collection not created");
        };
        service.move_reels(&["a".to_string()], Some(gym.id)).await.unwrap();

        let all = service.list_reels(ReelFilter::All).await.unwrap();
        assert_eq!(
            all.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["b", "a"]
        );

        let in_gym = service.list_reels(ReelFilter::Collection(gym.id)).await.unwrap();
        assert_eq!(in_gym.len(), 1);
        assert_eq!(in_gym[0].id, "a");

        let loose = service.list_reels(ReelFilter::Uncategorized).await.unwrap();
        assert_eq!(loose.len(), 1);
        assert_eq!(loose[0].id, "b");

        assert!(service.list_reels(ReelFilter::Collection(99)).await.is_err());
    }

    fn tagged(id: &str, url: &str, title: &str, tags: &[&str], created_at: i64) -> Reel {
        Reel {
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..reel(id, url, created_at)
        }
    }

    async fn searchable() -> LibraryService<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for reel in [
            tagged("p", "https://www.instagram.com/reel/p1", "Chef's 60s Pasta", &["Instagram", "Reels"], 1),
            tagged("s", "https://youtube.com/shorts/s1", "Squat form", &["YouTube", "Shorts"], 2),
            tagged("t", "https://www.tiktok.com/@a/video/3", "Ramen hack", &["TikTok"], 3),
            tagged("w", "https://example.com/blog", "Pasta blog", &[], 4),
        ] {
            store.insert(reel).await.unwrap();
        }
        LibraryService::new(store, FeaturePolicy::new(Tier::Icon))
    }

    fn ids(reels: &[Reel]) -> Vec<&str> {
        reels.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_search_matches_title_and_tags_ignoring_case() {
        let service = searchable().await;

        let pasta = service
            .search_reels(&ReelQuery::default().search("PASTA"))
            .await
            .unwrap();
        assert_eq!(ids(&pasta), vec!["w", "p"]);

        let shorts = service
            .search_reels(&ReelQuery::default().search("short"))
            .await
            .unwrap();
        assert_eq!(ids(&shorts), vec!["s"]);

        let blank = service
            .search_reels(&ReelQuery::default().search("  "))
            .await
            .unwrap();
        assert_eq!(blank.len(), 4);
    }

    #[tokio::test]
    async fn test_tag_filter_matches_any_selected_tag() {
        let service = searchable().await;
        let reels = service
            .search_reels(&ReelQuery::default().tags(["reels", "TikTok"]))
            .await
            .unwrap();
        assert_eq!(ids(&reels), vec!["t", "p"]);
    }

    #[tokio::test]
    async fn test_platform_filter_matches_url() {
        let service = searchable().await;
        let reels = service
            .search_reels(&ReelQuery::default().platform("YouTube"))
            .await
            .unwrap();
        assert_eq!(ids(&reels), vec!["s"]);
    }

    #[tokio::test]
    async fn test_filters_combine_with_scope() {
        let service = searchable().await;
        let CreateCollectionOutcome::Success(food) = service.create_collection(draft("Food")).await
        else {
            panic!("collection not created");
        };
        service
            .move_reels(&["p".to_string(), "t".to_string()], Some(food.id))
            .await
            .unwrap();

        let query = ReelQuery::new(ReelFilter::Collection(food.id)).search("pasta");
        assert_eq!(ids(&service.search_reels(&query).await.unwrap()), vec!["p"]);

        let query = ReelQuery::new(ReelFilter::Uncategorized).search("pasta");
        assert_eq!(ids(&service.search_reels(&query).await.unwrap()), vec!["w"]);
    }

    #[tokio::test]
    async fn test_available_tags_sorted_and_unique() {
        let service = searchable().await;
        let tags: Vec<String> = service.available_tags().await.unwrap().into_iter().collect();
        assert_eq!(tags, vec!["Instagram", "Reels", "Shorts", "TikTok", "YouTube"]);
    }

    #[tokio::test]
    async fn test_delete_collection_keeps_reels() {
        let (store, service) = service(Tier::Icon).await;
        let CreateCollectionOutcome::Success(gym) = service.create_collection(draft("Gym")).await
        else {
            panic!("collection not created");
        };
        service
            .move_reels(&["a".to_string(), "b".to_string()], Some(gym.id))
            .await
            .unwrap();

        assert_eq!(service.delete_collection(gym.id).await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(
            service.list_reels(ReelFilter::Uncategorized).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_update_reel_validates_title() {
        let (_, service) = service(Tier::Icon).await;
        let update = ReelUpdate {
            title: Some("   ".to_string()),
            ..ReelUpdate::default()
        };
        assert!(service.update_reel("a", update).await.is_err());
        assert!(service.update_reel("a", ReelUpdate::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_update_reel_notes() {
        let (_, service) = service(Tier::Icon).await;
        let update = ReelUpdate {
            title: Some("  Leg day ".to_string()),
            notes: Some(Some("try with 20kg".to_string())),
            ..ReelUpdate::default()
        };
        let reel = service.update_reel("a", update).await.unwrap();
        assert_eq!(reel.title, "Leg day");
        assert_eq!(reel.notes.as_deref(), Some("try with 20kg"));
        assert_eq!(reel.url, "https://tiktok.com/1");

        let cleared = service
            .update_reel(
                "a",
                ReelUpdate {
                    notes: Some(Some(" ".to_string())),
                    ..ReelUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.notes, None);
    }

    #[tokio::test]
    async fn test_delete_reels_requires_ids() {
        let (store, service) = service(Tier::Icon).await;
        assert!(service.delete_reels(&[]).await.is_err());
        assert_eq!(service.delete_reels(&["a".to_string()]).await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_reel() {
        let (_, service) = service(Tier::Icon).await;
        let err = service.get_reel("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: "Reel", .. }));
    }
}
