use serde::Deserialize;

/// Identity sent with every request; a desktop browser string avoids trivial bot blocking
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Path suffixes that are never worth crawling on documentation sites
pub const DEFAULT_IGNORE_SUFFIXES: &[&str] = &["search.html", "search", "changelog", "changelog.html"];

/// Main configuration structure for doc-crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub repository: RepositoryConfig,
}

/// Traversal limits and link filtering
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of link hops from the start location
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of fetches dispatched together in one batch
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: u32,

    /// Links whose path ends with one of these are never queued
    #[serde(rename = "ignore-suffixes")]
    pub ignore_suffixes: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_concurrent: 5,
            ignore_suffixes: DEFAULT_IGNORE_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Proxy endpoint for all outbound requests
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            proxy: None,
        }
    }
}

/// Repository hosting endpoints used by the tree strategy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Start locations on this host are crawled through the tree listing API
    pub host: String,

    #[serde(rename = "api-base")]
    pub api_base: String,

    #[serde(rename = "raw-base")]
    pub raw_base: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
        }
    }
}
