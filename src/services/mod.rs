//! Service layer for the vault.
//!
//! This module contains the business logic for:
//! - Page metadata scraping (`MetadataFetcher`)
//! - Tier limits and premium flags (`FeaturePolicy`)
//! - Collection and reel management (`LibraryService`)

mod library;
mod metadata;
mod policy;

pub use library::{CreateCollectionOutcome, LibraryService, ReelFilter, ReelQuery, Usage};
pub use metadata::{MetadataExtractor, MetadataFetcher, UNTITLED};
pub use policy::{FeaturePolicy, TierLimits, format_limit};
