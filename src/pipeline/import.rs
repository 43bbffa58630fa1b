//! Bulk import of shared links.
//!
//! Feeds a list of URLs through [`SaveReelPipeline`] with bounded
//! concurrency and tallies the outcomes.

use std::fmt;

use futures::stream::{self, StreamExt};

use super::save::{SaveOutcome, SaveReelPipeline};

/// Per-outcome tally of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub saved: usize,
    pub already_saved: usize,
    pub limit_reached: usize,
    pub invalid: usize,
    pub failed: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: &SaveOutcome) {
        self.total += 1;
        match outcome {
            SaveOutcome::Success(_) => self.saved += 1,
            SaveOutcome::AlreadyExists => self.already_saved += 1,
            SaveOutcome::LimitReached(_) => self.limit_reached += 1,
            SaveOutcome::InvalidUrl => self.invalid += 1,
            SaveOutcome::Error(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} link(s): {} saved, {} already saved, {} over limit, {} invalid, {} failed",
            self.total,
            self.saved,
            self.already_saved,
            self.limit_reached,
            self.invalid,
            self.failed
        )
    }
}

/// One URL per line. Blank lines and `#` comments are skipped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Save every URL, at most `concurrency` at a time.
///
/// Outcomes are returned in input order alongside the URL that produced them.
pub async fn run_import(
    pipeline: &SaveReelPipeline,
    urls: Vec<String>,
    concurrency: usize,
) -> (ImportSummary, Vec<(String, SaveOutcome)>) {
    let concurrency = concurrency.max(1);
    log::info!("Importing {} link(s), {} at a time", urls.len(), concurrency);

    let results: Vec<(String, SaveOutcome)> = stream::iter(urls)
        .map(|url| async move {
            let outcome = pipeline.save(&url).await;
            (url, outcome)
        })
        .buffered(concurrency)
        .collect()
        .await;

    let mut summary = ImportSummary::default();
    for (url, outcome) in &results {
        summary.record(outcome);
        if !outcome.is_success() {
            log::debug!("{}: {}", url, outcome);
        }
    }
    log::info!("Import finished: {}", summary);

    (summary, results)
}
