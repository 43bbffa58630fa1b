// src/services/metadata.rs

//! Page metadata fetcher.
//!
//! Issues a single GET for a shared link and pulls a title and thumbnail out
//! of the HTML with a handful of regex rules. This is a best-effort scraper,
//! not an HTML parser: every failure ends in `None` and the caller supplies
//! its own fallback.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;

use crate::error::Result;
use crate::models::{FetcherConfig, PageMetadata};
use crate::utils::http::{HttpClient, ReqwestClient};

/// Title used when a page has no recognizable title markup.
pub const UNTITLED: &str = "Untitled";

/// Compiled patterns for one `<meta>` property.
struct MetaTag {
    patterns: [Regex; 4],
}

impl MetaTag {
    fn new(property: &str) -> Result<Self> {
        let p = regex::escape(property);
        // Closing quote must match the opening one; the other kind may appear inside.
        let key = format!(r#"(?:"{p}"|'{p}')"#);
        let value = r#"(?:"([^"]*)"|'([^']*)')"#;
        Ok(Self {
            patterns: [
                Regex::new(&format!(r#"(?i)<meta\s+property={key}\s+content={value}"#))?,
                Regex::new(&format!(r#"(?i)<meta\s+content={value}\s+property={key}"#))?,
                Regex::new(&format!(r#"(?i)<meta\s+name={key}\s+content={value}"#))?,
                Regex::new(&format!(r#"(?i)<meta\s+content={value}\s+name={key}"#))?,
            ],
        })
    }

    /// First non-blank match across attribute orders, trimmed.
    fn find(&self, html: &str) -> Option<String> {
        self.patterns.iter().find_map(|re| capture_trimmed(re, html))
    }
}

/// Text of whichever capture group participated in the match.
fn capture_trimmed(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|caps| caps.iter().skip(1).flatten().next())
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Regex-based extractor for Open Graph / Twitter card metadata.
pub struct MetadataExtractor {
    og_title: MetaTag,
    twitter_title: MetaTag,
    og_image: MetaTag,
    twitter_image: MetaTag,
    title_tag: Regex,
}

impl MetadataExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            og_title: MetaTag::new("og:title")?,
            twitter_title: MetaTag::new("twitter:title")?,
            og_image: MetaTag::new("og:image")?,
            twitter_image: MetaTag::new("twitter:image")?,
            title_tag: Regex::new(r"(?i)<title[^>]*>([^<]+)</title>")?,
        })
    }

    /// Extract title and thumbnail from an HTML document.
    ///
    /// Title: `og:title`, then `twitter:title`, then `<title>`, then
    /// [`UNTITLED`]. Thumbnail: `og:image`, then `twitter:image`.
    pub fn extract(&self, html: &str) -> PageMetadata {
        let title = self
            .og_title
            .find(html)
            .or_else(|| self.twitter_title.find(html))
            .or_else(|| capture_trimmed(&self.title_tag, html))
            .unwrap_or_else(|| UNTITLED.to_string());

        let thumbnail = self
            .og_image
            .find(html)
            .or_else(|| self.twitter_image.find(html));

        PageMetadata { title, thumbnail }
    }
}

/// Fetches a page and extracts its metadata, swallowing every failure.
pub struct MetadataFetcher {
    client: Arc<dyn HttpClient>,
    timeout: Duration,
    extractor: MetadataExtractor,
}

impl MetadataFetcher {
    /// Create a fetcher over any HTTP client with a whole-request timeout.
    pub fn new(client: Arc<dyn HttpClient>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client,
            timeout,
            extractor: MetadataExtractor::new()?,
        })
    }

    /// Create a fetcher backed by `reqwest` with the configured user agent
    /// and timeout.
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        let client = Arc::new(ReqwestClient::new(config)?);
        Self::new(client, Duration::from_secs(config.timeout_secs))
    }

    /// Fetch `url` and extract its metadata.
    ///
    /// Returns `None` on transport errors, timeouts and non-2xx responses.
    pub async fn fetch(&self, url: &str) -> Option<PageMetadata> {
        let response = match tokio::time::timeout(self.timeout, self.client.get(url)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                log::warn!("Metadata fetch failed for {}: {}", url, e);
                return None;
            }
            Err(_) => {
                log::warn!(
                    "Metadata fetch timed out after {:?} for {}",
                    self.timeout,
                    url
                );
                return None;
            }
        };

        if !response.is_success() {
            log::warn!(
                "Metadata fetch for {} returned HTTP {}",
                url,
                response.status
            );
            return None;
        }

        let metadata = self.extractor.extract(&response.body);
        log::debug!("Scraped metadata for {}: {:?}", url, metadata);
        Some(metadata)
    }
}
