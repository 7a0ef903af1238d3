//! Crawl session - main crawl orchestration logic
//!
//! This module wires the crawl together:
//! - Choosing the extraction strategy once, from the start location's host
//! - Producing the seed entries (the start path, or a resolved repository tree)
//! - Seeding the visited set
//! - Handing everything to the scheduler, whose lazy sequence is returned as-is

use crate::config::Config;
use crate::crawler::fetcher::{ExtractMode, HttpClient, HttpSource, PageFetcher};
use crate::crawler::repository::{
    resolve_repository_seeds, GitHubTreeClient, RepoLocation, TreeLister,
};
use crate::crawler::scheduler::Scheduler;
use crate::crawler::{CrawlTarget, FrontierEntry};
use crate::url::{LinkFilter, VisitedSet};
use crate::{ConfigError, CrawlError};
use url::Url;

/// Extraction strategy, selected once per session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Generic website: fetch HTML, follow in-scope links
    Site,

    /// Repository markdown tree: list once, fetch raw documents, no links
    Repository(RepoLocation),
}

impl Strategy {
    /// Picks the strategy for a normalized start location
    ///
    /// # Returns
    ///
    /// * `Ok(Strategy::Repository)` - The host is the repository host and the
    ///   path has the tree shape
    /// * `Ok(Strategy::Site)` - Any other host
    /// * `Err(CrawlError::Usage)` - Repository host with a malformed path
    pub fn select(start: &Url, repository_host: &str) -> Result<Self, CrawlError> {
        let is_repository = start
            .host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(repository_host));

        if is_repository {
            RepoLocation::parse(start).map(Self::Repository)
        } else {
            Ok(Self::Site)
        }
    }

    /// How fetched bodies are processed under this strategy
    pub fn extract_mode(&self) -> ExtractMode {
        match self {
            Self::Site => ExtractMode::Markup,
            Self::Repository(_) => ExtractMode::Raw,
        }
    }
}

/// Session-wide knobs that are not part of the crawl target
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Batch size for concurrent fetches
    pub max_concurrent: usize,

    pub ignore_suffixes: Vec<String>,

    /// Host whose start locations use the repository strategy
    pub repository_host: String,

    /// Base of raw document URLs for the repository strategy
    pub raw_base: Url,
}

impl SessionSettings {
    /// Extracts the session settings from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let raw_base = parse_config_url("raw-base", &config.repository.raw_base)?;

        Ok(Self {
            max_concurrent: config.crawler.max_concurrent as usize,
            ignore_suffixes: config.crawler.ignore_suffixes.clone(),
            repository_host: config.repository.host.clone(),
            raw_base,
        })
    }
}

fn parse_config_url(key: &str, value: &str) -> Result<Url, CrawlError> {
    Url::parse(value).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)).into()
    })
}

/// Single entry point for crawling one target
///
/// The session holds only stateless collaborators; every call to
/// [`CrawlSession::crawl`] gets its own scheduler, frontier and visited set,
/// so one session can serve several crawls at once.
pub struct CrawlSession<S, L> {
    source: S,
    lister: L,
    settings: SessionSettings,
}

impl CrawlSession<HttpClient, GitHubTreeClient> {
    /// Builds a session on the production HTTP stack
    ///
    /// Both the page fetches and the tree listing share one reqwest client.
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let source = HttpClient::from_config(&config.http)?;
        let api_base = parse_config_url("api-base", &config.repository.api_base)?;
        let lister = GitHubTreeClient::new(source.client().clone(), api_base);

        Ok(Self::new(source, lister, SessionSettings::from_config(config)?))
    }
}

impl<S, L> CrawlSession<S, L>
where
    S: HttpSource + Clone,
    L: TreeLister,
{
    pub fn new(source: S, lister: L, settings: SessionSettings) -> Self {
        Self {
            source,
            lister,
            settings,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Starts a crawl and returns its lazy page sequence
    ///
    /// # Flow
    ///
    /// 1. Select the strategy from the start host (usage errors surface here,
    ///    before any network activity)
    /// 2. Seed: the start path at depth 0, or every resolved repository
    ///    document at depth 1
    /// 3. Seed the visited set with the start path and its index alias
    /// 4. Return the scheduler; nothing is fetched until it is pulled
    ///
    /// # Returns
    ///
    /// * `Ok(Scheduler)` - Ready to yield page records
    /// * `Err(CrawlError)` - Usage error or failed repository listing
    pub async fn crawl(&self, target: &CrawlTarget) -> Result<Scheduler<S>, CrawlError> {
        let start = target.start();
        tracing::info!(
            "Starting crawl from: {} - Max Depth: {}",
            start,
            target.max_depth()
        );

        let strategy = Strategy::select(start, &self.settings.repository_host)?;

        let seeds = match &strategy {
            Strategy::Site => vec![FrontierEntry {
                path: start.path().to_string(),
                depth: 0,
            }],
            Strategy::Repository(location) => {
                tracing::info!(
                    "Listing repository tree {}@{} under '{}'",
                    location.slug(),
                    location.reference,
                    location.sub_path
                );
                resolve_repository_seeds(&self.lister, location, &self.settings.raw_base).await?
            }
        };

        let visited = VisitedSet::seeded(start.path());
        let filter = LinkFilter::new(start.clone(), &self.settings.ignore_suffixes);
        let fetcher = PageFetcher::new(
            self.source.clone(),
            start.clone(),
            strategy.extract_mode(),
            filter,
        );

        Ok(Scheduler::new(
            fetcher,
            seeds,
            visited,
            target.max_depth(),
            self.settings.max_concurrent,
        ))
    }
}
