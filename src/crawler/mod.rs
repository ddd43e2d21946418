//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Listing-page link discovery
//! - Detail-page record assembly
//! - Request pacing
//! - Overall crawl coordination

mod assembler;
mod coordinator;
mod fetcher;
mod inspect;
mod parser;
mod scheduler;

pub use assembler::assemble_record;
pub use coordinator::{review_url, run_crawl, Coordinator, DEBUG_TRIAL_SIGHTS};
pub use fetcher::{
    backoff_delay, build_http_client, fetch_once, random_user_agent, FetchResult, Fetcher,
    USER_AGENTS,
};
pub use inspect::{
    inspect_listing, inspect_page, print_inspection, print_listing_inspection, Candidate,
    LinkCandidate, ListingInspection, PageInspection, MAX_INSPECTED_LINKS,
};
pub use parser::discover_sight_links;
pub use scheduler::Pacer;

use crate::config::Config;
use crate::Result;

/// Fetches a single detail page and inspects it
///
/// Returns `Ok(None)` when the page could not be fetched.
pub async fn debug_page(config: &Config, url: &str) -> Result<Option<PageInspection>> {
    let fetcher = Fetcher::new(config)?;
    Ok(fetcher.fetch(url).await.map(|html| inspect_page(&html)))
}

/// Fetches a listing page and runs its links through the link filter
pub async fn debug_listing(config: &Config, url: &str) -> Result<Option<ListingInspection>> {
    let fetcher = Fetcher::new(config)?;
    Ok(fetcher.fetch(url).await.map(|html| inspect_listing(&html)))
}
