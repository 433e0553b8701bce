//! Sitetree: a same-origin site mapper
//!
//! This crate implements a breadth-first web crawler that maps a single site,
//! producing a JSON tree of every reachable page with its title, outbound
//! links, and images.

pub mod crawler;
pub mod output;
pub mod page;
pub mod url;

use thiserror::Error;

/// Main error type for sitetree operations
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("page {url} has not been loaded")]
    NotLoaded { url: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("failed to parse URL: {0}")]
    Parse(String),

    #[error("cannot resolve {reference:?} against {base}: {message}")]
    Resolve {
        reference: String,
        base: String,
        message: String,
    },
}

/// Fetch-specific errors
///
/// Any of these marks the page as visited-but-failed; none of them aborts
/// the crawl.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Result type alias for sitetree operations
pub type Result<T> = std::result::Result<T, SiteError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crawler::{crawl, CrawlConfig};
pub use output::SiteTree;
pub use page::{Page, PageRecord};
pub use url::NormalizedUrl;
