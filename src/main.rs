//! doc-crawler main entry point
//!
//! This is the command-line interface for turning a documentation site into
//! a JSON page corpus.

use anyhow::Context;
use clap::Parser;
use doc_crawler::config::{apply_env_overrides, load_config_or_default, validate, Config};
use doc_crawler::crawler::{crawl, CrawlTarget};
use doc_crawler::output::{print_statistics, write_json, write_json_file};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// doc-crawler: documentation site to JSON corpus
///
/// Crawls a documentation site breadth-first from URL, staying under the
/// start path, and writes every page's text as `{url, content}` records.
/// GitHub `tree` URLs are read as a markdown repository instead.
#[derive(Parser, Debug)]
#[command(name = "doc-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a documentation site into a JSON corpus", long_about = None)]
struct Cli {
    /// Start URL; crawling never leaves this path
    #[arg(value_name = "URL")]
    url: String,

    /// Output file, or '-' for stdout
    #[arg(value_name = "OUTFILE")]
    outfile: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth from the start page
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum pages fetched at once
    #[arg(long, value_name = "N")]
    max_concurrent: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that `-` can stream the corpus to stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_crawler=info,warn"),
            1 => EnvFilter::new("doc_crawler=debug,info"),
            2 => EnvFilter::new("doc_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves configuration: file, then environment, then command-line flags
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }

    let mut config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())
        .context("Invalid environment override")?;

    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(concurrent) = cli.max_concurrent {
        config.crawler.max_concurrent = concurrent;
    }
    validate(&config).context("Invalid command-line option")?;

    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let target = CrawlTarget::new(&cli.url, config.crawler.max_depth)?;

    let mut pages = crawl(&config, &target).await?;

    let mut records = Vec::new();
    while let Some(page) = pages.next_page().await {
        records.push(page);
    }

    if cli.outfile == "-" {
        write_json(&records, std::io::stdout().lock()).context("Failed to write to stdout")?;
    } else {
        let path = PathBuf::from(&cli.outfile);
        write_json_file(&records, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if !cli.quiet {
        print_statistics(&pages.stats());
    }

    Ok(())
}
