// src/models/mod.rs

//! Domain models for the vault.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod collection;
mod config;
mod reel;
mod tier;

// Re-export all public types
pub use collection::{Collection, CollectionDraft};
pub use config::{Config, FetcherConfig, LoggingConfig, VaultConfig};
pub use reel::{Reel, ReelUpdate};
pub use tier::Tier;

/// Title and thumbnail scraped from a web page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub thumbnail: Option<String>,
}
