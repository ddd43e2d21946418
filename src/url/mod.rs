//! URL handling module for Sight-Crawler
//!
//! This module provides link normalization, detail-page recognition,
//! listing pagination and the region-to-city lookup.

mod domain;
mod matcher;
mod normalize;
mod region;

// Re-export main functions
pub use domain::extract_domain;
pub use matcher::{is_valid_sight_url, DISALLOWED_MARKERS, SIGHT_HOSTS};
pub use normalize::{listing_page_url, normalize_sight_url, SITE_BASE};
pub use region::{city_from_url, REGION_CITIES};

/// Normalizes a raw href and keeps it only if it is an attraction detail page
///
/// Hrefs that cannot be normalized are dropped with a debug log.
///
/// ```
/// use sight_crawler::url::accept_sight_link;
///
/// assert_eq!(
///     accept_sight_link("/sight/beijing1/229.html").as_deref(),
///     Some("https://you.ctrip.com/sight/beijing1/229.html")
/// );
/// assert_eq!(accept_sight_link("/sight/beijing1/s0-p2.html"), None);
/// ```
pub fn accept_sight_link(href: &str) -> Option<String> {
    match normalize_sight_url(href) {
        Ok(url) if is_valid_sight_url(&url) => Some(url),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Failed to normalize link {}: {}", href, e);
            None
        }
    }
}
