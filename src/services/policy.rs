// src/services/policy.rs

//! Tier-based feature gating.
//!
//! Limits per tier:
//! - Scouter: 50 saved reels, 3 collections
//! - Producer: 1000 saved reels, 10 collections
//! - Icon: unlimited, plus AI, cloud sync and advanced search
//!
//! `None` stands for "unlimited" throughout.

use serde::Serialize;

use crate::models::Tier;

/// Static limit table entry for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierLimits {
    pub max_saved_items: Option<usize>,
    pub max_collections: Option<usize>,
    pub premium: bool,
}

impl TierLimits {
    pub const fn of(tier: Tier) -> Self {
        match tier {
            Tier::Scouter => Self {
                max_saved_items: Some(50),
                max_collections: Some(3),
                premium: false,
            },
            Tier::Producer => Self {
                max_saved_items: Some(1000),
                max_collections: Some(10),
                premium: false,
            },
            Tier::Icon => Self {
                max_saved_items: None,
                max_collections: None,
                premium: true,
            },
        }
    }
}

/// Feature limits and availability for a subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturePolicy {
    tier: Tier,
}

impl FeaturePolicy {
    pub fn new(tier: Tier) -> Self {
        Self { tier }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn limits(&self) -> TierLimits {
        TierLimits::of(self.tier)
    }

    pub fn max_saved_items(&self) -> Option<usize> {
        self.limits().max_saved_items
    }

    pub fn max_collections(&self) -> Option<usize> {
        self.limits().max_collections
    }

    /// Whether one more reel fits under the limit.
    pub fn can_save(&self, current_count: usize) -> bool {
        below_limit(self.max_saved_items(), current_count)
    }

    /// Whether one more collection fits under the limit.
    pub fn can_create_collection(&self, current_count: usize) -> bool {
        below_limit(self.max_collections(), current_count)
    }

    pub fn remaining_saves(&self, current_count: usize) -> Option<usize> {
        remaining(self.max_saved_items(), current_count)
    }

    pub fn remaining_collections(&self, current_count: usize) -> Option<usize> {
        remaining(self.max_collections(), current_count)
    }

    pub fn has_advanced_search(&self) -> bool {
        self.limits().premium
    }

    pub fn has_cloud_sync(&self) -> bool {
        self.limits().premium
    }

    pub fn has_ai_access(&self) -> bool {
        self.limits().premium
    }
}

impl Default for FeaturePolicy {
    fn default() -> Self {
        Self::new(Tier::default())
    }
}

fn below_limit(max: Option<usize>, current: usize) -> bool {
    max.is_none_or(|max| current < max)
}

fn remaining(max: Option<usize>, current: usize) -> Option<usize> {
    max.map(|max| max.saturating_sub(current))
}

/// Render a limit for display.
pub fn format_limit(limit: Option<usize>) -> String {
    limit.map_or_else(|| "unlimited".to_string(), |n| n.to_string())
}
