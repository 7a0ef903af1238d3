//! Configuration module for doc-crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! plus the environment overrides the crawler has always honored.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [crawler]
//! max-depth = 2
//! max-concurrent = 8
//! ignore-suffixes = ["search.html", "changelog"]
//!
//! [http]
//! timeout-secs = 20
//! proxy = "http://127.0.0.1:8080"
//!
//! [repository]
//! host = "github.com"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use doc_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, RepositoryConfig, DEFAULT_IGNORE_SUFFIXES,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, load_config, load_config_or_default, ENV_HTTPS_PROXY, ENV_MAX_CONCURRENT,
    ENV_MAX_DEPTH,
};
pub use validation::validate;
