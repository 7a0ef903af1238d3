//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`HttpSource`] seam
//! - HTML parsing into text and links
//! - Repository tree resolution for GitHub sources
//! - Breadth-first scheduling in bounded batches
//! - Overall crawl session orchestration

mod coordinator;
mod fetcher;
mod parser;
mod repository;
mod scheduler;

pub use coordinator::{CrawlSession, SessionSettings, Strategy};
pub use fetcher::{build_http_client, ExtractMode, HttpClient, HttpResponse, HttpSource, PageFetcher};
pub use parser::{extract_hrefs, html_to_text, parse_html, ParsedPage};
pub use repository::{
    resolve_repository_seeds, GitHubTreeClient, RepoLocation, TreeEntry, TreeEntryKind,
    TreeLister, REPOSITORY_SEED_DEPTH,
};
pub use scheduler::{CrawlStats, Scheduler};

use crate::config::Config;
use crate::url::normalize_start_url;
use crate::CrawlError;
use serde::{Deserialize, Serialize};
use url::Url;

/// What to crawl and how deep
///
/// Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    start: Url,
    max_depth: u32,
}

impl CrawlTarget {
    /// Creates a target from caller input
    ///
    /// The start location is normalized to directory form. A missing or
    /// malformed start location is a usage error.
    pub fn new(start: &str, max_depth: u32) -> Result<Self, CrawlError> {
        if start.trim().is_empty() {
            return Err(CrawlError::Usage("A start URL is required".to_string()));
        }

        let start = normalize_start_url(start)
            .map_err(|e| CrawlError::Usage(format!("Invalid start URL '{}': {}", start, e)))?;

        Ok(Self { start, max_depth })
    }

    /// The normalized start location
    pub fn start(&self) -> &Url {
        &self.start
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

/// One unit of pending work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Origin-relative path, or an absolute URL for repository documents
    pub path: String,

    /// Link hops from the start location
    pub depth: u32,
}

/// Outcome of fetching one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Absolute URL that was fetched
    pub url: String,
    pub path: String,
    pub depth: u32,
    pub text: String,

    /// In-scope candidate paths, de-duplicated, in page order
    pub links: Vec<String>,
}

/// A page of the produced corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub content: String,
}

/// Runs a complete crawl with the production HTTP stack
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Pick the extraction strategy for the start location
/// 3. Resolve the seed entries
/// 4. Return the scheduler that yields page records lazily
///
/// # Example
///
/// ```no_run
/// use doc_crawler::config::Config;
/// use doc_crawler::crawler::{crawl, CrawlTarget};
///
/// # async fn example() -> Result<(), doc_crawler::CrawlError> {
/// let target = CrawlTarget::new("https://example.com/docs/", 2)?;
/// let mut pages = crawl(&Config::default(), &target).await?;
/// while let Some(page) = pages.next_page().await {
///     println!("{}", page.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, target: &CrawlTarget) -> Result<Scheduler<HttpClient>, CrawlError> {
    CrawlSession::from_config(config)?.crawl(target).await
}
