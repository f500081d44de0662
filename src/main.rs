//! Sitemap-Primer main entry point
//!
//! This is the command-line interface for the Sitemap-Primer cache warmer.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use sitemap_primer::config::{load_config_with_hash, resolve, ConfigFile, CrawlConfig, Overrides};
use sitemap_primer::crawler::{build_http_client, crawl};
use sitemap_primer::output::log_summary;
use sitemap_primer::sitemap::sitemap_urls;
use sitemap_primer::ConfigError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Primer: warm a site's page cache from its sitemap
///
/// Requests every URL in an XML sitemap, highest priority first. With a
/// cache directory, pages already present in the local file cache are
/// skipped.
#[derive(Parser, Debug)]
#[command(name = "sitemap-primer")]
#[command(version)]
#[command(about = "Prime a page cache from an XML sitemap", long_about = None)]
struct Cli {
    /// Sitemap URL or local file (overrides the config file)
    #[arg(value_name = "SITEMAP")]
    sitemap: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seconds to wait between requests (fractions allowed)
    #[arg(short, long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Base directory of the local page cache; enables local mode
    #[arg(short = 'l', long, value_name = "DIR", conflicts_with = "no_local")]
    cache_dir: Option<PathBuf>,

    /// URL prefix that corresponds to the cache directory
    #[arg(short = 'b', long, value_name = "URL")]
    url_base: Option<String>,

    /// File name probed inside each cached page's directory
    #[arg(short = 'f', long, value_name = "NAME")]
    cache_file: Option<String>,

    /// Disable local mode even if the config file enables it
    #[arg(long)]
    no_local: bool,

    /// Stop after this many requests
    #[arg(long, value_name = "N")]
    max: Option<usize>,

    /// Print the ordered URL list and exit without crawling
    #[arg(long)]
    print: bool,

    /// Don't report failed requests or bad responses
    #[arg(long)]
    no_warn: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            sitemap: self.sitemap.clone(),
            crawl_delay: self.delay,
            cache_dir: self.cache_dir.clone(),
            url_base: self.url_base.clone(),
            cache_file: self.cache_file.clone(),
            no_local: self.no_local,
            max_primes: self.max,
            no_warn: self.no_warn,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let file = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (file, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            file
        }
        None => ConfigFile::default(),
    };

    let config = match resolve(file, cli.overrides()) {
        Ok(config) => config,
        Err(ConfigError::MissingSitemap) => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "a sitemap is required, either as an argument or in the config file",
            )
            .exit(),
        Err(e) => return Err(e).context("Invalid configuration"),
    };

    if cli.print {
        handle_print(&config).await
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_primer=info,warn"),
            1 => EnvFilter::new("sitemap_primer=debug,info"),
            2 => EnvFilter::new("sitemap_primer=trace,debug"),
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

/// Handles the --print mode: prints the ordered URL list to stdout
async fn handle_print(config: &CrawlConfig) -> anyhow::Result<()> {
    let client = build_http_client(config)?;
    let urls = sitemap_urls(&client, &config.sitemap).await?;

    for url in urls {
        println!("{}", url);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: CrawlConfig) -> anyhow::Result<()> {
    tracing::info!("Priming from {}", config.sitemap);
    if !config.local_mode_enabled() {
        tracing::info!("Local mode is off; every URL will be requested");
    }
    if !config.crawl_delay.is_zero() {
        tracing::info!("Waiting {:?} between requests", config.crawl_delay);
    }

    match crawl(config).await {
        Ok(summary) => {
            log_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
