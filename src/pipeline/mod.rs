//! Pipeline entry points for saving shared links.
//!
//! - `SaveReelPipeline::save`: Turn one shared URL into a stored reel
//! - `run_import`: Save a list of URLs with bounded concurrency

pub mod import;
pub mod save;

pub use import::{ImportSummary, parse_url_list, run_import};
pub use save::{SaveOutcome, SaveReelPipeline};
