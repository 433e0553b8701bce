//! Crawler module: fetching, parsing, the frontier, and scheduling
//!
//! This module contains the crawl engine:
//! - HTTP fetching (the only code that performs network I/O)
//! - HTML parsing and reference extraction
//! - The frontier's admission/dedup gate and quiescence detection
//! - The worker pool that drives a crawl to completion

mod fetcher;
mod frontier;
mod parser;
mod scheduler;

pub use fetcher::{build_http_client, fetch_url};
pub use frontier::Frontier;
pub use parser::{parse_html, ParsedPage};
pub use scheduler::Scheduler;

use crate::output::SiteTree;
use crate::SiteError;
use std::time::Duration;

/// Configuration for a single crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The root URL; also the scope prefix discovered links must extend
    pub root_url: String,

    /// Maximum BFS depth from the root; `None` means unbounded
    pub max_depth: Option<u32>,

    /// Number of concurrent workers
    pub workers: usize,

    /// Extra fetch attempts after a failure (0 = single attempt)
    pub fetch_retries: u32,

    /// Wall-clock limit after which the frontier is sealed and the partial
    /// tree is returned
    pub time_limit: Option<Duration>,

    /// User agent sent with every request
    pub user_agent: String,
}

impl CrawlConfig {
    /// Creates a configuration with defaults for everything but the root URL
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            max_depth: None,
            workers: default_workers(),
            fetch_retries: 0,
            time_limit: None,
            user_agent: concat!("sitetree/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Default worker count, derived from available parallelism
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Runs a complete crawl and returns the resulting site tree
///
/// This is the main library entry point. It seeds the frontier with the root
/// page, drives the worker pool until quiescence (or the configured time
/// limit), and returns the accumulated tree. Failed pages appear in the tree
/// with a null title and empty links/images.
///
/// # Example
///
/// ```no_run
/// use sitetree::{crawl, CrawlConfig};
///
/// # async fn example() -> sitetree::Result<()> {
/// let mut config = CrawlConfig::new("https://example.com/");
/// config.max_depth = Some(2);
/// let tree = crawl(config).await?;
/// println!("{}", tree.to_json_pretty()?);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlConfig) -> Result<SiteTree, SiteError> {
    Scheduler::new(config)?.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CrawlConfig::new("https://example.com/");
        assert_eq!(config.max_depth, None);
        assert!(config.workers >= 1);
        assert_eq!(config.fetch_retries, 0);
        assert!(config.user_agent.starts_with("sitetree/"));
    }
}
