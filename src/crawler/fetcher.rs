//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with a browser-like identity, timeouts and proxy
//! - The [`HttpSource`] seam the rest of the crawler fetches through
//! - Turning one frontier entry into a [`FetchResult`]
//! - Error classification

use crate::config::HttpConfig;
use crate::crawler::parser::parse_html;
use crate::crawler::{FetchResult, FrontierEntry};
use crate::url::LinkFilter;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Proxy};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Status and body of one GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,

    /// Location the body was served from, after redirects
    pub final_url: Url,

    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to GET a URL
///
/// Implementations carry their own headers (user agent, timeouts). They must
/// not hold crawl state: one source may serve several sessions at once.
#[async_trait]
pub trait HttpSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<HttpResponse, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. an unusable proxy)
///
/// # Example
///
/// ```no_run
/// use doc_crawler::config::HttpConfig;
/// use doc_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        tracing::debug!("Routing requests through proxy {}", proxy);
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    builder.build()
}

/// [`HttpSource`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        build_http_client(config).map(Self::new)
    }

    /// The underlying reqwest client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpSource for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: describe_request_error(&e),
            })?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();

        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(HttpResponse {
            status,
            final_url,
            body,
        })
    }
}

/// Classifies a reqwest failure into a short message
fn describe_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        format!("Too many redirects: {}", error)
    } else {
        error.to_string()
    }
}

/// How a fetched body becomes text and links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Convert HTML to text and discover links
    Markup,

    /// Keep the body verbatim; never discover links
    Raw,
}

/// Turns frontier entries into fetch results
///
/// Holds no mutable state, so every entry of a batch can be fetched
/// concurrently through a shared reference.
#[derive(Debug, Clone)]
pub struct PageFetcher<S> {
    source: S,
    base: Url,
    mode: ExtractMode,
    filter: LinkFilter,
}

impl<S: HttpSource> PageFetcher<S> {
    /// Creates a fetcher resolving entry paths against `base`
    pub fn new(source: S, base: Url, mode: ExtractMode, filter: LinkFilter) -> Self {
        Self {
            source,
            base,
            mode,
            filter,
        }
    }

    /// Absolute URL of an entry
    pub fn resolve(&self, entry: &FrontierEntry) -> Result<Url, FetchError> {
        self.base
            .join(&entry.path)
            .map_err(|_| FetchError::InvalidUrl {
                base: self.base.to_string(),
                path: entry.path.clone(),
            })
    }

    /// Fetches one entry
    ///
    /// # Request Flow
    ///
    /// 1. Resolve the entry path against the crawl base
    /// 2. GET the URL; any non-2xx status is an error
    /// 3. Markup mode: convert to text and keep in-scope candidate links,
    ///    resolving hrefs against the URL the page was served from
    ///    Raw mode: keep the body as-is, no links
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResult)` - The page text and its candidate links
    /// * `Err(FetchError)` - Network, status, body or markup failure for this page
    pub async fn fetch(&self, entry: &FrontierEntry) -> Result<FetchResult, FetchError> {
        let url = self.resolve(entry)?;
        tracing::debug!("Crawl {} (depth {})", url, entry.depth);

        let response = self.source.fetch(&url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        let (text, links) = match self.mode {
            ExtractMode::Raw => (response.body, Vec::new()),
            ExtractMode::Markup => {
                let parsed = parse_html(&response.body).map_err(|e| FetchError::Markup {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

                if response.final_url != url {
                    tracing::debug!("{} redirected to {}", url, response.final_url);
                }
                let links = self
                    .filter
                    .candidates(parsed.hrefs.iter().map(String::as_str), &response.final_url);
                (parsed.text, links)
            }
        };

        Ok(FetchResult {
            url: url.to_string(),
            path: entry.path.clone(),
            depth: entry.depth,
            text,
            links,
        })
    }
}
