//! Collection data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Maximum icon identifier length in characters.
const MAX_ICON_CHARS: usize = 16;

/// A user-defined group of reels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    /// Store-assigned identifier
    pub id: u64,

    /// Display name (e.g., "Gym", "Recipes")
    pub name: String,

    /// Hex color code (e.g., "#FF6B9D")
    pub color: String,

    /// Icon identifier or emoji
    pub icon: String,

    /// Number of reels in this collection, computed on read
    #[serde(default, skip_serializing)]
    pub item_count: usize,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} {} | {} | {} item(s)",
            self.id, self.icon, self.name, self.color, self.item_count
        )
    }
}

/// Fields supplied when creating or updating a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDraft {
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl CollectionDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
        }
    }

    /// Trim all fields and check them.
    pub fn validated(self) -> Result<Self> {
        let draft = Self {
            name: self.name.trim().to_string(),
            color: self.color.trim().to_string(),
            icon: self.icon.trim().to_string(),
        };

        if draft.name.is_empty() {
            return Err(AppError::validation("Collection name is empty"));
        }
        if !is_hex_color(&draft.color) {
            return Err(AppError::validation(format!(
                "Invalid collection color '{}', expected #RGB or #RRGGBB",
                draft.color
            )));
        }
        if draft.icon.is_empty() || draft.icon.chars().count() > MAX_ICON_CHARS {
            return Err(AppError::validation(format!(
                "Collection icon must be 1-{MAX_ICON_CHARS} characters"
            )));
        }
        Ok(draft)
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
