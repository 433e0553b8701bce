//! Page model for crawlable documents
//!
//! A [`Page`] owns its own fetch-and-parse lifecycle: constructed unloaded
//! with only a URL and a BFS level, it becomes effectively immutable once
//! `load()` succeeds. Identity is the normalized URL alone; two pages with
//! the same URL are interchangeable regardless of level or load state, which
//! is what the frontier's dedup relies on.

use crate::crawler::{fetch_url, parse_html};
use crate::{FetchError, NormalizedUrl, SiteError, UrlError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Delay between retry attempts in `load_with_retry`
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// One crawlable document
#[derive(Debug, Clone)]
pub struct Page {
    url: NormalizedUrl,
    level: u32,
    loaded: bool,
    title: Option<String>,
    links: Vec<NormalizedUrl>,
    images: Vec<NormalizedUrl>,
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Page {}

impl Hash for Page {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

impl Page {
    /// Constructs an unloaded page from a raw URL string
    ///
    /// Normalizes the URL, propagating a [`UrlError`] on malformed input.
    pub fn new(raw: &str, level: u32) -> Result<Self, UrlError> {
        Ok(Self::from_url(NormalizedUrl::parse(raw)?, level))
    }

    /// Constructs an unloaded page from an already-normalized URL
    pub fn from_url(url: NormalizedUrl, level: u32) -> Self {
        Self {
            url,
            level,
            loaded: false,
            title: None,
            links: Vec::new(),
            images: Vec::new(),
        }
    }

    /// The page's canonical URL
    pub fn url(&self) -> &NormalizedUrl {
        &self.url
    }

    /// BFS depth of this page relative to the crawl root
    pub fn level(&self) -> u32 {
        self.level
    }

    /// True once `load()` has succeeded
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// The page title, if loaded and present
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Image URLs found on the page, resolved against the page URL
    pub fn images(&self) -> &[NormalizedUrl] {
        &self.images
    }

    /// Fetches the page and extracts its title, links, and images
    ///
    /// On transport failure or a non-success status this returns the
    /// [`FetchError`] and leaves the page unloaded; the caller records it as
    /// visited-but-failed rather than aborting the crawl. Individual
    /// anchor/image references that fail to resolve are logged and skipped.
    pub async fn load(&mut self, client: &Client) -> Result<(), FetchError> {
        tracing::info!("visiting {}", self.url);
        let body = fetch_url(client, self.url.as_str()).await?;

        let parsed = parse_html(&body);
        self.title = parsed.title;
        self.links = self.resolve_refs(&parsed.anchor_hrefs);
        self.images = self.resolve_refs(&parsed.image_srcs);
        self.loaded = true;

        tracing::debug!(
            "loaded {} ({} links, {} images)",
            self.url,
            self.links.len(),
            self.images.len()
        );
        Ok(())
    }

    /// `load()` wrapped in a bounded retry loop
    ///
    /// `retries` is the number of extra attempts after the first failure;
    /// zero means a single attempt.
    pub async fn load_with_retry(
        &mut self,
        client: &Client,
        retries: u32,
    ) -> Result<(), FetchError> {
        let mut attempt = 0;
        loop {
            match self.load(client).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < retries => {
                    attempt += 1;
                    tracing::debug!(
                        "retrying {} (attempt {}/{}): {}",
                        self.url,
                        attempt,
                        retries,
                        e
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Returns the outbound links discovered on this page
    ///
    /// Links are in first-occurrence order with duplicates removed, computed
    /// from already-parsed data; calling this never triggers a fetch. Fails
    /// with `NotLoaded` if `load()` has not succeeded.
    pub fn child_links(&self) -> Result<&[NormalizedUrl], SiteError> {
        if !self.loaded {
            return Err(SiteError::NotLoaded {
                url: self.url.to_string(),
            });
        }
        Ok(&self.links)
    }

    /// Serializes the current state, loaded or not
    ///
    /// Unloaded pages serialize with a null title and empty links/images.
    /// This never performs network I/O.
    pub fn to_record(&self) -> PageRecord {
        PageRecord {
            page_url: self.url.as_str().to_string(),
            title: self.title.clone(),
            links: self.links.iter().map(|u| u.as_str().to_string()).collect(),
            images: self.images.iter().map(|u| u.as_str().to_string()).collect(),
            level: self.level,
        }
    }

    /// Reconstructs an unloaded page from a serialized record
    ///
    /// Only URL identity survives the round trip; content is re-fetchable
    /// and intentionally dropped.
    pub fn from_record(record: &PageRecord) -> Result<Self, UrlError> {
        Self::new(&record.page_url, record.level)
    }

    /// Resolves raw references against the page URL, deduplicating while
    /// preserving first-occurrence order
    fn resolve_refs(&self, refs: &[String]) -> Vec<NormalizedUrl> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();
        for raw in refs {
            match self.url.resolve(raw) {
                Ok(url) => {
                    if seen.insert(url.clone()) {
                        resolved.push(url);
                    }
                }
                Err(e) => {
                    tracing::debug!("skipping malformed reference on {}: {}", self.url, e);
                }
            }
        }
        resolved
    }
}

/// JSON-serializable record of a page's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_url: String,
    pub title: Option<String>,
    pub links: Vec<String>,
    pub images: Vec<String>,
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_url() {
        let page = Page::new("https://EXAMPLE.com/a/#frag", 0).unwrap();
        assert_eq!(page.url().as_str(), "https://example.com/a");
        assert!(!page.loaded());
    }

    #[test]
    fn test_new_malformed_url() {
        assert!(Page::new("not a url", 0).is_err());
    }

    #[test]
    fn test_equality_by_url_only() {
        let a = Page::new("https://example.com/a", 0).unwrap();
        let b = Page::new("https://example.com/a/", 7).unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_child_links_before_load_fails() {
        let page = Page::new("https://example.com/", 0).unwrap();
        let result = page.child_links();
        assert!(matches!(result, Err(SiteError::NotLoaded { .. })));
    }

    #[test]
    fn test_unloaded_record_has_empty_fields() {
        let page = Page::new("https://example.com/about", 1).unwrap();
        let record = page.to_record();
        assert_eq!(record.page_url, "https://example.com/about");
        assert_eq!(record.title, None);
        assert!(record.links.is_empty());
        assert!(record.images.is_empty());
        assert_eq!(record.level, 1);
    }

    #[test]
    fn test_record_round_trip_preserves_url_identity() {
        let page = Page::new("https://Example.com/a/b/../c", 2).unwrap();
        let restored = Page::from_record(&page.to_record()).unwrap();
        assert_eq!(page, restored);
        assert_eq!(restored.level(), 2);
    }

    #[test]
    fn test_resolve_refs_dedup_preserves_order() {
        let page = Page::new("https://example.com/docs/index.html", 0).unwrap();
        let refs = vec![
            "b".to_string(),
            "/a".to_string(),
            "b".to_string(),
            "b#frag".to_string(),
            "http://%".to_string(), // malformed, skipped
        ];
        let resolved = page.resolve_refs(&refs);
        let as_strings: Vec<&str> = resolved.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            as_strings,
            vec!["https://example.com/docs/b", "https://example.com/a"]
        );
    }
}
