//! Saved reel data structure.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-saved reference to an external video post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reel {
    /// Opaque unique identifier
    pub id: String,

    /// Normalized canonical URL
    pub url: String,

    /// Display title (never empty)
    pub title: String,

    /// Thumbnail image URL, empty when unavailable
    #[serde(default)]
    pub thumbnail: String,

    /// Platform/content tags inferred from the URL at save time
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation time in epoch milliseconds
    pub created_at: i64,

    /// Owning collection, `None` when uncategorized
    #[serde(default)]
    pub collection_id: Option<u64>,

    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Reel {
    /// Creation time as a UTC timestamp.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    pub fn is_uncategorized(&self) -> bool {
        self.collection_id.is_none()
    }
}

impl fmt::Display for Reel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.id, self.title, self.url)?;
        if !self.tags.is_empty() {
            write!(f, " [{}]", self.tags.join(", "))?;
        }
        Ok(())
    }
}

/// User-editable reel fields. `None` leaves a field untouched.
///
/// The URL, tags, id and creation time are fixed at save time and cannot be
/// edited.
#[derive(Debug, Clone, Default)]
pub struct ReelUpdate {
    pub title: Option<String>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
    /// `Some(None)` moves the reel out of its collection
    pub collection_id: Option<Option<u64>>,
}

impl ReelUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.notes.is_none() && self.collection_id.is_none()
    }

    /// Apply the update in place.
    pub fn apply(&self, reel: &mut Reel) {
        if let Some(title) = &self.title {
            reel.title = title.clone();
        }
        if let Some(notes) = &self.notes {
            reel.notes = notes.clone();
        }
        if let Some(collection_id) = self.collection_id {
            reel.collection_id = collection_id;
        }
    }
}
