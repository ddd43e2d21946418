use serde::Deserialize;

/// Main configuration structure for Sight-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_regions", rename = "region")]
    pub regions: Vec<RegionEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            http: HttpConfig::default(),
            output: OutputConfig::default(),
            regions: default_regions(),
        }
    }
}

/// Crawl limits and toggles
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of attraction records to assemble
    #[serde(rename = "max-sights")]
    pub max_sights: usize,

    /// Number of listing pages walked per region
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Fetch attempts per URL before giving up
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Per-attempt request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Lower bound of the randomized delay between fetches (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the randomized delay between fetches (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,

    /// Run a small trial crawl before the full one
    #[serde(rename = "debug-mode")]
    pub debug_mode: bool,

    /// Crawl review pages after the attraction crawl
    #[serde(rename = "crawl-reviews")]
    pub crawl_reviews: bool,

    /// Number of cleaned attractions whose reviews are crawled
    #[serde(rename = "max-reviews-per-sight")]
    pub max_reviews_per_sight: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_sights: 100,
            max_pages: 3,
            max_retries: 3,
            timeout_secs: 10,
            min_delay_ms: 1000,
            max_delay_ms: 2000,
            debug_mode: false,
            crawl_reviews: false,
            max_reviews_per_sight: 10,
        }
    }
}

/// HTTP behaviour of the fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Unit of the exponential backoff between attempts (milliseconds)
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Lower bound of the wait after a 403/429 response (milliseconds)
    #[serde(rename = "blocked-min-wait-ms")]
    pub blocked_min_wait_ms: u64,

    /// Upper bound of the wait after a 403/429 response (milliseconds)
    #[serde(rename = "blocked-max-wait-ms")]
    pub blocked_max_wait_ms: u64,

    /// Referer header sent with every request
    pub referer: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: 1000,
            blocked_min_wait_ms: 10_000,
            blocked_max_wait_ms: 30_000,
            referer: "https://you.ctrip.com/".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving JSON and CSV data files
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Optional path of the markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            summary_path: None,
        }
    }
}

/// A region whose listing pages seed the crawl
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegionEntry {
    /// Display name of the region
    pub name: String,

    /// First listing page, ending in `-p1.html`
    #[serde(rename = "listing-url")]
    pub listing_url: String,
}

fn default_regions() -> Vec<RegionEntry> {
    [
        ("北京", "https://you.ctrip.com/sight/beijing1/s0-p1.html"),
        ("上海", "https://you.ctrip.com/sight/shanghai2/s0-p1.html"),
        ("广州", "https://you.ctrip.com/sight/guangzhou152/s0-p1.html"),
        ("深圳", "https://you.ctrip.com/sight/shenzhen26/s0-p1.html"),
    ]
    .into_iter()
    .map(|(name, listing_url)| RegionEntry {
        name: name.to_string(),
        listing_url: listing_url.to_string(),
    })
    .collect()
}
