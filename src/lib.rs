//! doc-crawler: turns a documentation site into a page corpus
//!
//! This crate implements a breadth-first, depth-bounded crawler that converts a
//! documentation website (or a GitHub repository's markdown tree) into an ordered
//! sequence of `{url, content}` page records.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for crawl sessions
///
/// Everything in here is fatal for the session. Per-page failures are
/// [`FetchError`]s and never abort a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Failed to list repository tree for {repo}: {message}")]
    RepositoryListing { repo: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors for a single page fetch
///
/// These are recovered by the scheduler: the page yields no record and no links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Cannot resolve {path} against {base}")]
    InvalidUrl { base: String, path: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Failed to render markup of {url}: {message}")]
    Markup { url: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnv { name: String, value: String },
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlSession, CrawlTarget, PageRecord};
pub use crate::url::{normalize_start_url, LinkFilter, VisitedSet};
