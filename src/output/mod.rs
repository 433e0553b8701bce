//! Output module: the site tree and its JSON form
//!
//! The tree is append-only during a crawl: one record per visited URL, each
//! written by the single worker that owned that URL. Keys are kept sorted so
//! the serialized output is stable across runs and worker counts.

use crate::page::PageRecord;
use crate::SiteError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from canonical URL to page record; the crawl's final output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteTree {
    #[serde(flatten)]
    pages: BTreeMap<String, PageRecord>,
}

impl SiteTree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a page, keyed by its canonical URL
    ///
    /// Append-only: the first record for a URL wins. With the frontier's
    /// admission gate in place a second insert for the same key cannot
    /// happen during a crawl.
    pub fn insert(&mut self, record: PageRecord) {
        self.pages.entry(record.page_url.clone()).or_insert(record);
    }

    /// Looks up the record for a canonical URL
    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.get(url)
    }

    /// True if the tree contains a record for `url`
    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    /// Number of recorded pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if no page has been recorded
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterates over (url, record) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PageRecord)> {
        self.pages.iter()
    }

    /// Serializes the tree as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the tree as pretty-printed JSON, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<(), SiteError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        tracing::info!("wrote {} pages to {}", self.len(), path.display());
        Ok(())
    }
}
