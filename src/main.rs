//! Sight-Crawler main entry point
//!
//! This is the command-line interface for the Sight-Crawler attraction harvester.

use anyhow::Context;
use clap::Parser;
use sight_crawler::config::{apply_env_overrides, load_config_with_hash, validate, Config};
use sight_crawler::crawler::{
    debug_listing, debug_page, print_inspection, print_listing_inspection, run_crawl,
};
use sight_crawler::output::{print_quality, DataQuality, FileStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sight-Crawler: a travel-site attraction harvester
///
/// Sight-Crawler walks regional attraction listings, extracts name, rating,
/// address and introduction from every detail page, cleans the results and
/// writes them out as JSON and CSV.
#[derive(Parser, Debug)]
#[command(name = "sight-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A travel-site attraction harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["debug_url", "debug_listing", "stats", "recent"])]
    dry_run: bool,

    /// Fetch one detail page and print what each extractor finds
    #[arg(long, value_name = "URL", conflicts_with_all = ["dry_run", "debug_listing", "stats", "recent"])]
    debug_url: Option<String>,

    /// Fetch one listing page and show which links pass the link filter
    #[arg(long, value_name = "URL", conflicts_with_all = ["dry_run", "debug_url", "stats", "recent"])]
    debug_listing: Option<String>,

    /// Load a sights JSON file and print its data quality report
    #[arg(long, value_name = "FILE", conflicts_with_all = ["dry_run", "debug_url", "debug_listing", "recent"])]
    stats: Option<PathBuf>,

    /// List data files in the data directory, newest first
    #[arg(long, conflicts_with_all = ["dry_run", "debug_url", "debug_listing", "stats"])]
    recent: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Environment overrides (and RUST_LOG) may come from a .env file
    let dotenv_path = dotenvy::dotenv().ok();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);
    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let (config, config_hash) = load(cli.config.as_deref())?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
    } else if let Some(url) = &cli.debug_url {
        handle_debug_url(&config, url).await?;
    } else if let Some(url) = &cli.debug_listing {
        handle_debug_listing(&config, url).await?;
    } else if let Some(file) = &cli.stats {
        handle_stats(&config, file)?;
    } else if cli.recent {
        handle_recent(&config)?;
    } else {
        handle_crawl(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        match verbose {
            0 => EnvFilter::new("sight_crawler=info,warn"),
            1 => EnvFilter::new("sight_crawler=debug,info"),
            2 => EnvFilter::new("sight_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults plus environment overrides
fn load(path: Option<&Path>) -> anyhow::Result<(Config, String)> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok((config, hash))
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            let mut config = Config::default();
            apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
            validate(&config)?;
            Ok((config, "defaults".to_string()))
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, config_hash: &str) {
    println!("=== Sight-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max attractions: {}", config.crawler.max_sights);
    println!("  Listing pages per region: {}", config.crawler.max_pages);
    println!("  Max attempts per URL: {}", config.crawler.max_retries);
    println!("  Request timeout: {}s", config.crawler.timeout_secs);
    println!(
        "  Delay between requests: {}-{}ms",
        config.crawler.min_delay_ms, config.crawler.max_delay_ms
    );
    println!("  Debug trial: {}", config.crawler.debug_mode);
    println!(
        "  Reviews: {} (first {} attractions)",
        config.crawler.crawl_reviews, config.crawler.max_reviews_per_sight
    );

    println!("\nHTTP:");
    println!("  Backoff base: {}ms", config.http.backoff_base_ms);
    println!(
        "  Blocked wait: {}-{}ms",
        config.http.blocked_min_wait_ms, config.http.blocked_max_wait_ms
    );
    println!("  Referer: {}", config.http.referer);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    match &config.output.summary_path {
        Some(path) => println!("  Summary: {}", path),
        None => println!("  Summary: (none)"),
    }

    println!("\nRegions ({}):", config.regions.len());
    for region in &config.regions {
        println!("  - {}: {}", region.name, region.listing_url);
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
    println!(
        "✓ Would walk {} listing pages",
        config.regions.len() as u64 * u64::from(config.crawler.max_pages)
    );
}

/// Handles the --debug-url mode: inspects a single detail page
async fn handle_debug_url(config: &Config, url: &str) -> anyhow::Result<()> {
    match debug_page(config, url).await? {
        Some(inspection) => print_inspection(url, &inspection),
        None => println!("Could not fetch page: {}", url),
    }
    Ok(())
}

/// Handles the --debug-listing mode: checks link filtering on one listing page
async fn handle_debug_listing(config: &Config, url: &str) -> anyhow::Result<()> {
    match debug_listing(config, url).await? {
        Some(inspection) => print_listing_inspection(url, &inspection),
        None => println!("Could not fetch page: {}", url),
    }
    Ok(())
}

/// Handles the --stats mode: prints the quality report of a saved file
fn handle_stats(config: &Config, file: &Path) -> anyhow::Result<()> {
    let store = FileStore::new(&config.output.data_dir);
    let name = file.to_string_lossy();
    let records = store
        .load_sights_json(&name)
        .with_context(|| format!("failed to load {}", name))?;

    println!("File: {}\n", name);
    print_quality(&DataQuality::from_records(&records));
    Ok(())
}

/// Handles the --recent mode: lists data files
fn handle_recent(config: &Config) -> anyhow::Result<()> {
    let store = FileStore::new(&config.output.data_dir);
    let files = store.recent_files()?;

    println!("Data directory: {}\n", store.data_dir().display());
    if files.is_empty() {
        println!("No data files found");
    }
    for file in files {
        println!("  {}", file);
    }
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Regions: {}, listing pages per region: {}",
        config.regions.len(),
        config.crawler.max_pages
    );

    match run_crawl(config, config_hash).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl completed: {} attractions kept, {} reviews",
                summary.records_cleaned,
                summary.reviews_collected
            );
            for path in &summary.files_written {
                tracing::info!("  wrote {}", path.display());
            }
            for failure in &summary.save_failures {
                tracing::warn!("  not saved: {}", failure);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
