//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with cookies and compression
//! - Browser-like headers with a rotating User-Agent
//! - Retry with exponential backoff for transient failures
//! - Long waits when the site signals blocking (403/429)

use crate::config::{Config, CrawlerConfig, HttpConfig};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, REFERER,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Desktop browser User-Agent strings rotated per request
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/119.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13.5; rv:109.0) Gecko/20100101 Firefox/119.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36 Edg/119.0.0.0",
];

const MAX_REDIRECTS: usize = 10;

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body decoded as UTF-8
        body: String,
    },

    /// The site refused service (403 or 429)
    Blocked {
        /// The HTTP status code
        status_code: u16,
    },

    /// Any other non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// The client keeps a cookie store across requests, follows up to ten
/// redirects and applies the configured per-request timeout.
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Picks a User-Agent string at random
pub fn random_user_agent() -> &'static str {
    USER_AGENTS[rand::random_range(0..USER_AGENTS.len())]
}

/// Browser-like request headers with a freshly chosen User-Agent
fn request_headers(http: &HttpConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(random_user_agent()));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.8,en-US;q=0.5,en;q=0.3"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    if let Ok(referer) = HeaderValue::from_str(&http.referer) {
        headers.insert(REFERER, referer);
    }
    headers
}

/// Performs one GET request and classifies the outcome
pub async fn fetch_once(client: &Client, url: &str, http: &HttpConfig) -> FetchResult {
    let response = match client.get(url).headers(request_headers(http)).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection error".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return FetchResult::Blocked {
            status_code: status.as_u16(),
        };
    }
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.bytes().await {
        Ok(bytes) => FetchResult::Success {
            final_url,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt`
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Randomized wait after the site blocked a request
fn blocked_wait(http: &HttpConfig) -> Duration {
    let (low, high) = (http.blocked_min_wait_ms, http.blocked_max_wait_ms);
    let millis = if high > low {
        rand::random_range(low..=high)
    } else {
        low
    };
    Duration::from_millis(millis)
}

/// Page fetcher with retry and blocking back-off
///
/// Failures never escape as errors: once every attempt is spent the fetch
/// yields `None` and the caller skips the URL.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    crawler: CrawlerConfig,
    http: HttpConfig,
}

impl Fetcher {
    /// Creates a fetcher from the loaded configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(&config.crawler)?,
            crawler: config.crawler.clone(),
            http: config.http.clone(),
        })
    }

    /// Fetches `url`, retrying up to `max-retries` attempts
    pub async fn fetch(&self, url: &str) -> Option<String> {
        let attempts = self.crawler.max_retries.max(1);

        for attempt in 0..attempts {
            match fetch_once(&self.client, url, &self.http).await {
                FetchResult::Success { final_url, body } => {
                    if final_url != url {
                        tracing::debug!("Fetched {} (redirected to {})", url, final_url);
                    } else {
                        tracing::debug!("Fetched {}", url);
                    }
                    return Some(body);
                }
                FetchResult::Blocked { status_code } => {
                    let wait = blocked_wait(&self.http);
                    tracing::warn!(
                        "Access restricted for {} (HTTP {}), waiting {:?}",
                        url,
                        status_code,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("Request for {} failed with HTTP {}", url, status_code);
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!("Attempt {} for {} failed: {}", attempt + 1, url, error);
                }
            }

            if attempt + 1 < attempts {
                let wait = backoff_delay(self.http.backoff_base_ms, attempt);
                tracing::info!("Retrying {} in {:?}", url, wait);
                tokio::time::sleep(wait).await;
            }
        }

        tracing::error!("Giving up on {} after {} attempts", url, attempts);
        None
    }
}
