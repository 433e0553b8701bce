//! Crawl frontier: pending-work queue, visited set, and admission gate
//!
//! The frontier is the single synchronization point for dedup. A URL enters
//! the visited set at most once, through [`Frontier::try_admit`], and only
//! then may a page for it be queued. Termination is detected by a two-part
//! quiescence condition: the queue is empty AND no popped page is still in
//! flight. An empty queue alone proves nothing, because an in-flight worker
//! may still push children. Both halves of the condition live under one lock
//! so the check is atomic against pops, pushes, and completions.

use crate::{NormalizedUrl, Page};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

/// Bounded wait between quiescence checks while the queue is empty
const POP_WAIT: Duration = Duration::from_millis(25);

/// Queue state guarded by a single lock, so quiescence (empty queue, zero
/// in flight) is observed atomically
struct FrontierInner {
    /// Pending pages in FIFO (breadth-first) order
    queue: VecDeque<Page>,

    /// Pages popped but not yet completed
    in_flight: usize,
}

/// Shared, concurrency-safe work queue for the crawl
pub struct Frontier {
    inner: Mutex<FrontierInner>,

    /// URLs ever admitted; the sole dedup gate
    visited: Mutex<HashSet<NormalizedUrl>>,

    /// Once sealed, no further pops succeed (cancellation)
    sealed: AtomicBool,

    /// Wakes waiting workers on push, completion, and seal
    notify: Notify,

    /// Canonical text of the crawl root; admitted URLs must extend it
    scope_prefix: String,

    /// Maximum admissible level, if configured
    max_depth: Option<u32>,
}

impl Frontier {
    /// Creates an empty frontier scoped under `root`
    pub fn new(root: &NormalizedUrl, max_depth: Option<u32>) -> Self {
        Self {
            inner: Mutex::new(FrontierInner {
                queue: VecDeque::new(),
                in_flight: 0,
            }),
            visited: Mutex::new(HashSet::new()),
            sealed: AtomicBool::new(false),
            notify: Notify::new(),
            scope_prefix: root.as_str().to_string(),
            max_depth,
        }
    }

    /// Atomically checks scope, depth, and the visited set
    ///
    /// Returns true exactly when the URL passed all predicates and was not
    /// yet visited; the URL is then marked visited and the caller is expected
    /// to construct and [`push`](Self::push) a page for it. No other code
    /// path inserts into the visited set, so a true return means this caller
    /// exclusively owns the URL.
    pub fn try_admit(&self, url: &NormalizedUrl, level: u32) -> bool {
        if !url.as_str().starts_with(&self.scope_prefix) {
            tracing::trace!("rejecting {} (outside scope {})", url, self.scope_prefix);
            return false;
        }

        if let Some(max) = self.max_depth {
            if level > max {
                tracing::trace!("rejecting {} (level {} > max depth {})", url, level, max);
                return false;
            }
        }

        // Check-and-insert under one lock: two workers discovering the same
        // URL concurrently cannot both see it as unvisited.
        self.visited.lock().unwrap().insert(url.clone())
    }

    /// Enqueues a page already admitted via [`try_admit`](Self::try_admit)
    pub fn push(&self, page: Page) {
        if self.sealed.load(Ordering::Acquire) {
            tracing::debug!("dropping {} (frontier sealed)", page.url());
            return;
        }

        self.inner.lock().unwrap().queue.push_back(page);
        self.notify.notify_one();
    }

    /// Dequeues the next pending page in FIFO order
    ///
    /// Returns `None` once the crawl is quiescent (queue empty and nothing
    /// in flight) or the frontier has been sealed. A successful pop
    /// increments the in-flight count; the caller must eventually call
    /// [`complete`](Self::complete) exactly once for it.
    pub async fn pop(&self) -> Option<Page> {
        loop {
            if self.sealed.load(Ordering::Acquire) {
                return None;
            }

            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(page) = inner.queue.pop_front() {
                    inner.in_flight += 1;
                    return Some(page);
                }
                if inner.in_flight == 0 {
                    return None;
                }
            }

            // Someone is still working and may push children; wait a bounded
            // interval so the quiescence check re-runs even on a lost wakeup.
            let _ = tokio::time::timeout(POP_WAIT, self.notify.notified()).await;
        }
    }

    /// Marks a previously popped page as finished
    ///
    /// The page's children must already have been pushed: completion is the
    /// last step, otherwise a peer could observe a false quiescence.
    pub fn complete(&self) {
        let remaining = {
            let mut inner = self.inner.lock().unwrap();
            debug_assert!(inner.in_flight > 0, "complete() without a matching pop()");
            inner.in_flight -= 1;
            inner.in_flight
        };

        if remaining == 0 {
            // Possibly the last worker; wake everyone so they can observe
            // quiescence and exit.
            self.notify.notify_waiters();
        }
    }

    /// Seals the frontier: in-flight loads finish, no further pops succeed
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
        self.notify.notify_waiters();
        tracing::info!("frontier sealed, draining in-flight fetches");
    }

    /// True once [`seal`](Self::seal) has been called
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Number of pages currently queued
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    /// Number of URLs ever admitted
    pub fn visited_count(&self) -> usize {
        self.visited.lock().unwrap().len()
    }
}
