//! Crawl scheduler: seeds the frontier and drives the worker pool
//!
//! One crawl moves through Seeding -> Running -> Draining -> Done. During
//! Running, W workers loop over the frontier: pop a page, load it, record it
//! into the shared tree, admit and push its children. Draining begins when a
//! worker observes quiescence (or the frontier is sealed by the time limit);
//! workers then exit and the accumulated tree is returned, partial or not.
//!
//! The visited set (inside the frontier) and the tree are the only shared
//! mutable state. Each page is exclusively owned by the worker that popped
//! it, and each tree key is written by exactly one worker because admission
//! hands out every URL at most once.

use crate::crawler::{build_http_client, CrawlConfig, Frontier};
use crate::output::SiteTree;
use crate::{NormalizedUrl, Page, SiteError};
use reqwest::Client;
use std::sync::{Arc, Mutex};

/// Drives a single crawl to completion
pub struct Scheduler {
    config: CrawlConfig,
    root: NormalizedUrl,
    frontier: Arc<Frontier>,
    tree: Arc<Mutex<SiteTree>>,
    client: Client,
}

impl Scheduler {
    /// Creates a scheduler for the configured root URL
    ///
    /// An unparsable root URL fails here, before any fetching starts.
    pub fn new(config: CrawlConfig) -> Result<Self, SiteError> {
        let root = NormalizedUrl::parse(&config.root_url)?;
        let frontier = Arc::new(Frontier::new(&root, config.max_depth));
        let client = build_http_client(&config.user_agent)?;

        Ok(Self {
            config,
            root,
            frontier,
            tree: Arc::new(Mutex::new(SiteTree::new())),
            client,
        })
    }

    /// Runs the crawl and returns the accumulated tree
    pub async fn run(self) -> Result<SiteTree, SiteError> {
        let workers = self.config.workers.max(1);
        tracing::info!(
            "starting crawl of {} ({} workers, max depth {:?})",
            self.root,
            workers,
            self.config.max_depth
        );
        let start = std::time::Instant::now();

        // Seeding: the root always passes its own scope and depth checks
        let seeded = self.frontier.try_admit(&self.root, 0);
        debug_assert!(seeded, "root admission cannot fail on a fresh frontier");
        self.frontier.push(Page::from_url(self.root.clone(), 0));

        // Optional wall-clock limit seals the frontier; in-flight fetches
        // finish and the partial tree is still returned.
        if let Some(limit) = self.config.time_limit {
            let frontier = Arc::clone(&self.frontier);
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                if frontier.pending() > 0 {
                    tracing::warn!("time limit {:?} reached, sealing frontier", limit);
                }
                frontier.seal();
            });
        }

        // Running: spawn the worker pool
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let frontier = Arc::clone(&self.frontier);
            let tree = Arc::clone(&self.tree);
            let client = self.client.clone();
            let retries = self.config.fetch_retries;
            handles.push(tokio::spawn(async move {
                worker_loop(id, frontier, tree, client, retries).await;
            }));
        }

        // Draining: workers exit on quiescence or seal
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("worker task failed: {}", e);
            }
        }

        let tree = Arc::try_unwrap(self.tree)
            .map(|mutex| mutex.into_inner().unwrap())
            .unwrap_or_else(|arc| arc.lock().unwrap().clone());

        tracing::info!(
            "crawl done: {} pages in {:?}",
            tree.len(),
            start.elapsed()
        );
        Ok(tree)
    }
}

/// One worker: pop, load, record, admit children, repeat until quiescent
async fn worker_loop(
    id: usize,
    frontier: Arc<Frontier>,
    tree: Arc<Mutex<SiteTree>>,
    client: Client,
    retries: u32,
) {
    while let Some(mut page) = frontier.pop().await {
        if let Err(e) = page.load_with_retry(&client, retries).await {
            // Recorded below as visited-but-failed; the crawl continues
            tracing::warn!("failed to load {}: {}", page.url(), e);
        }

        if page.loaded() {
            let child_level = page.level() + 1;
            if let Ok(links) = page.child_links() {
                for link in links {
                    if frontier.try_admit(link, child_level) {
                        frontier.push(Page::from_url(link.clone(), child_level));
                    }
                }
            }
        }

        tree.lock().unwrap().insert(page.to_record());

        // Children are pushed before this page leaves the in-flight count,
        // so no other worker can observe a false quiescence in between.
        frontier.complete();
    }

    tracing::debug!("worker {} draining", id);
}
