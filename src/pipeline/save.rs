// src/pipeline/save.rs

//! Save-from-URL pipeline.
//!
//! Turns a raw shared link into a stored [`Reel`]:
//! validate → normalize → dedupe → limit check → scrape → tag → insert.
//!
//! The duplicate and limit checks run before the network call so that a
//! rejected save costs nothing. They run a second time inside the commit
//! section, which is serialized, so concurrent saves of one URL store it
//! once and concurrent saves cannot overshoot the tier limit.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::Reel;
use crate::services::{FeaturePolicy, MetadataFetcher};
use crate::storage::ReelStore;
use crate::utils::{fallback_title, infer_tags, is_savable_url, new_id, normalize, now_millis};

/// Result of saving a shared URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Success(Reel),
    AlreadyExists,
    LimitReached(usize),
    InvalidUrl,
    Error(String),
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SaveOutcome::Success(_))
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveOutcome::Success(reel) => write!(f, "Saved \"{}\" ({})", reel.title, reel.url),
            SaveOutcome::AlreadyExists => f.write_str("Already saved"),
            SaveOutcome::LimitReached(max) => write!(
                f,
                "Vault full: your tier allows {max} saved reels. Upgrade to save more."
            ),
            SaveOutcome::InvalidUrl => f.write_str("Invalid link: expected an http(s) URL"),
            SaveOutcome::Error(message) => write!(f, "Could not save: {message}"),
        }
    }
}

/// Orchestrates a single save per call.
pub struct SaveReelPipeline {
    store: Arc<dyn ReelStore>,
    fetcher: Arc<MetadataFetcher>,
    policy: FeaturePolicy,
    commit_lock: Mutex<()>,
}

impl SaveReelPipeline {
    pub fn new(
        store: Arc<dyn ReelStore>,
        fetcher: Arc<MetadataFetcher>,
        policy: FeaturePolicy,
    ) -> Self {
        Self {
            store,
            fetcher,
            policy,
            commit_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> FeaturePolicy {
        self.policy
    }

    /// Save a raw shared URL. Never returns an error; faults become
    /// [`SaveOutcome::Error`].
    pub async fn save(&self, raw_url: &str) -> SaveOutcome {
        match self.try_save(raw_url).await {
            Ok(outcome) => outcome,
            Err(AppError::Duplicate(url)) => {
                log::debug!("Insert rejected duplicate {}", url);
                SaveOutcome::AlreadyExists
            }
            Err(e) => {
                log::error!("Failed to save {}: {}", raw_url.trim(), e);
                SaveOutcome::Error(e.to_string())
            }
        }
    }

    async fn try_save(&self, raw_url: &str) -> Result<SaveOutcome> {
        let raw_url = raw_url.trim();
        if !is_savable_url(raw_url) {
            log::debug!("Rejected invalid URL {:?}", raw_url);
            return Ok(SaveOutcome::InvalidUrl);
        }

        let url = normalize(raw_url);

        if self.store.exists_by_url(&url).await? {
            log::info!("Already saved: {}", url);
            return Ok(SaveOutcome::AlreadyExists);
        }
        if let Some(max) = self.limit_reached().await? {
            log::info!("Save limit of {} reached for tier {}", max, self.policy.tier());
            return Ok(SaveOutcome::LimitReached(max));
        }

        let (title, thumbnail) = match self.fetcher.fetch(&url).await {
            Some(metadata) => (metadata.title, metadata.thumbnail.unwrap_or_default()),
            None => (fallback_title(&url), String::new()),
        };

        let reel = Reel {
            id: new_id(),
            tags: infer_tags(&url),
            url,
            title,
            thumbnail,
            created_at: now_millis(),
            collection_id: None,
            notes: None,
        };

        let _guard = self.commit_lock.lock().await;
        if self.store.exists_by_url(&reel.url).await? {
            log::info!("Saved concurrently: {}", reel.url);
            return Ok(SaveOutcome::AlreadyExists);
        }
        if let Some(max) = self.limit_reached().await? {
            return Ok(SaveOutcome::LimitReached(max));
        }
        self.store.insert(reel.clone()).await?;

        log::info!("Saved {} as {} ({})", reel.url, reel.id, reel.title);
        Ok(SaveOutcome::Success(reel))
    }

    /// The saved-item limit, if the store is already at it.
    async fn limit_reached(&self) -> Result<Option<usize>> {
        let current = self.store.count().await?;
        if self.policy.can_save(current) {
            return Ok(None);
        }
        Ok(Some(self.policy.max_saved_items().unwrap_or(current)))
    }
}
