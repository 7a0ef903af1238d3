use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;
use std::str::FromStr;

/// Overrides `crawler.max-depth`
pub const ENV_MAX_DEPTH: &str = "CRAWLER_MAX_DEPTH";

/// Overrides `crawler.max-concurrent`
pub const ENV_MAX_CONCURRENT: &str = "CRAWLER_MAX_CONCURRENT";

/// Overrides `http.proxy`
pub const ENV_HTTPS_PROXY: &str = "HTTPS_PROXY";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use doc_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Loads the file if one was given, otherwise starts from the defaults
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

/// Applies environment overrides on top of a loaded configuration
///
/// `lookup` is normally `|name| std::env::var(name).ok()`; tests pass a map.
/// Empty values are ignored. Values that do not parse are an error rather than
/// being silently replaced by defaults.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(depth) = parse_env(&lookup, ENV_MAX_DEPTH)? {
        config.crawler.max_depth = depth;
    }

    if let Some(concurrent) = parse_env(&lookup, ENV_MAX_CONCURRENT)? {
        config.crawler.max_concurrent = concurrent;
    }

    if let Some(proxy) = lookup(ENV_HTTPS_PROXY).filter(|v| !v.trim().is_empty()) {
        config.http.proxy = Some(proxy.trim().to_string());
    }

    validate(config)
}

fn parse_env<F, T>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                name: name.to_string(),
                value,
            }),
        _ => Ok(None),
    }
}
