//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - The FIFO work-list of frontier entries, which grows while it is drained
//! - Dispatching bounded batches of concurrent fetches
//! - Depth ceiling enforcement
//! - Merging discovered links through the visited set
//!
//! Batches are synchronous: a new batch is not dispatched until every fetch
//! of the previous one has resolved. The visited set and the work-list are
//! only touched in the merge step between batches, so they need no locking,
//! and records come out in strict breadth-first order.

use crate::crawler::fetcher::{HttpSource, PageFetcher};
use crate::crawler::{FetchResult, FrontierEntry, PageRecord};
use crate::url::VisitedSet;
use crate::FetchError;
use futures::future::join_all;
use futures::Stream;
use std::collections::VecDeque;
use std::time::Instant;

/// Counters maintained over one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Fetches attempted
    pub pages_fetched: u64,

    /// Page records yielded
    pub pages_emitted: u64,

    /// Fetches that failed and were skipped
    pub fetch_failures: u64,

    /// Links accepted into the frontier
    pub links_enqueued: u64,

    /// Entries never fetched because they were deeper than the ceiling
    pub skipped_depth: u64,

    /// Deepest level a record was emitted from
    pub deepest_level: u32,
}

/// Drives the breadth-first traversal
///
/// The scheduler is a pull-based, finite sequence: nothing is fetched until
/// [`Scheduler::next_page`] is awaited, and a caller that stops pulling simply
/// leaves the remaining batches undispatched.
pub struct Scheduler<S> {
    fetcher: PageFetcher<S>,

    /// Every accepted entry, in enqueue order
    pending: Vec<FrontierEntry>,

    /// Index of the first undispatched entry in `pending`
    cursor: usize,

    visited: VisitedSet,

    /// Records of the last completed batch not yet handed out
    ready: VecDeque<PageRecord>,

    max_depth: u32,
    max_concurrent: usize,
    stats: CrawlStats,
    started: Option<Instant>,
    finished: bool,
}

impl<S: HttpSource> Scheduler<S> {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetches and extracts one entry
    /// * `seeds` - Initial frontier entries, fetched first and in order
    /// * `visited` - Paths that must never be queued again
    /// * `max_depth` - Depth ceiling
    /// * `max_concurrent` - Batch size; values below 1 are treated as 1
    pub fn new(
        fetcher: PageFetcher<S>,
        seeds: Vec<FrontierEntry>,
        mut visited: VisitedSet,
        max_depth: u32,
        max_concurrent: usize,
    ) -> Self {
        for seed in &seeds {
            visited.insert(&seed.path);
        }

        Self {
            fetcher,
            pending: seeds,
            cursor: 0,
            visited,
            ready: VecDeque::new(),
            max_depth,
            max_concurrent: max_concurrent.max(1),
            stats: CrawlStats::default(),
            started: None,
            finished: false,
        }
    }

    /// Returns the next page record, running batches as needed
    ///
    /// Returns `None` once the frontier is exhausted.
    pub async fn next_page(&mut self) -> Option<PageRecord> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Some(record);
            }

            if self.cursor >= self.pending.len() {
                self.finish();
                return None;
            }

            self.run_batch().await;
        }
    }

    /// Converts the scheduler into a stream of page records
    pub fn into_stream(self) -> impl Stream<Item = PageRecord> {
        futures::stream::unfold(self, |mut scheduler| async move {
            scheduler
                .next_page()
                .await
                .map(|record| (record, scheduler))
        })
    }

    /// Drains the whole crawl into memory
    pub async fn collect(mut self) -> (Vec<PageRecord>, CrawlStats) {
        let mut records = Vec::new();
        while let Some(record) = self.next_page().await {
            records.push(record);
        }
        (records, self.stats)
    }

    /// Counters so far
    pub fn stats(&self) -> CrawlStats {
        self.stats
    }

    /// Number of entries not yet dispatched
    pub fn frontier_size(&self) -> usize {
        self.pending.len() - self.cursor
    }

    /// Returns whether the frontier is exhausted and every record handed out
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty() && self.frontier_size() == 0
    }

    /// The visited set, for inspection
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Fetches the next batch and merges its results
    async fn run_batch(&mut self) {
        self.started.get_or_insert_with(Instant::now);

        let end = (self.cursor + self.max_concurrent).min(self.pending.len());
        let mut batch = Vec::with_capacity(end - self.cursor);
        for entry in &self.pending[self.cursor..end] {
            if entry.depth > self.max_depth {
                tracing::debug!("Skipping {} beyond max depth", entry.path);
                self.stats.skipped_depth += 1;
                continue;
            }
            batch.push(entry.clone());
        }
        self.cursor = end;

        if batch.is_empty() {
            return;
        }

        tracing::debug!(
            "Dispatching batch of {} ({} left in frontier)",
            batch.len(),
            self.frontier_size()
        );

        let fetcher = &self.fetcher;
        let results = join_all(batch.iter().map(|entry| fetcher.fetch(entry))).await;

        for (entry, result) in batch.iter().zip(results) {
            self.stats.pages_fetched += 1;
            match result {
                Ok(fetched) => self.merge(fetched),
                Err(error) => self.record_failure(entry, &error),
            }
        }
    }

    /// Emits a record for one result and queues its links
    fn merge(&mut self, fetched: FetchResult) {
        let FetchResult {
            url,
            depth,
            text,
            links,
            ..
        } = fetched;

        if depth < self.max_depth {
            for link in links {
                if self.visited.insert(&link) {
                    self.pending.push(FrontierEntry {
                        path: link,
                        depth: depth + 1,
                    });
                    self.stats.links_enqueued += 1;
                }
            }
        }

        if !text.trim().is_empty() && depth <= self.max_depth {
            self.stats.pages_emitted += 1;
            self.stats.deepest_level = self.stats.deepest_level.max(depth);
            self.ready.push_back(PageRecord { url, content: text });
        } else {
            tracing::debug!("No content extracted from {}", url);
        }
    }

    fn record_failure(&mut self, entry: &FrontierEntry, error: &FetchError) {
        self.stats.fetch_failures += 1;
        tracing::warn!("Skipping {} (depth {}): {}", entry.path, entry.depth, error);
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        let elapsed = self.started.map(|s| s.elapsed()).unwrap_or_default();
        tracing::info!(
            "Crawl completed: {} pages emitted from {} fetches ({} failed) in {:?}",
            self.stats.pages_emitted,
            self.stats.pages_fetched,
            self.stats.fetch_failures,
            elapsed
        );
    }
}
