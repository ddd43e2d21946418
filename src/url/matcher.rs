use crate::url::domain::extract_domain;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Substrings that mark a link as something other than an attraction page
///
/// Covers listing pagination, non-attraction sections of the site, the
/// mobile mirror and promotion-tracking links.
pub const DISALLOWED_MARKERS: &[&str] = &[
    "/s0-p",
    "javascript",
    "/allvision",
    "/food",
    "/shopping",
    "/activity",
    "gs.ctrip.com",
    "html5/you",
    "?pofid=",
];

/// Hosts serving attraction detail pages
pub const SIGHT_HOSTS: &[&str] = &["you.ctrip.com", "www.ctrip.com"];

static SIGHT_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/sight/\w+/\d+\.html$").unwrap());

/// Checks whether an absolute URL points at an attraction detail page
///
/// A URL is accepted when all of the following hold:
/// - it contains none of the [`DISALLOWED_MARKERS`]
/// - its host is one of [`SIGHT_HOSTS`]
/// - its path is `/sight/{region}/{digits}.html` with a non-zero id
///
/// # Examples
///
/// ```
/// use sight_crawler::url::is_valid_sight_url;
///
/// assert!(is_valid_sight_url("https://you.ctrip.com/sight/beijing1/229.html"));
/// assert!(!is_valid_sight_url("https://you.ctrip.com/sight/beijing1/s0-p2.html"));
/// assert!(!is_valid_sight_url("https://you.ctrip.com/sight/beijing1/229.html?pofid=1"));
/// ```
pub fn is_valid_sight_url(candidate: &str) -> bool {
    if DISALLOWED_MARKERS
        .iter()
        .any(|marker| candidate.contains(marker))
    {
        return false;
    }

    let url = match Url::parse(candidate) {
        Ok(url) => url,
        Err(_) => return false,
    };

    let host_ok = extract_domain(&url)
        .map(|host| SIGHT_HOSTS.contains(&host.as_str()))
        .unwrap_or(false);
    if !host_ok {
        return false;
    }

    // Id 0 pages are topic collections, not attractions
    if url.path().ends_with("/0.html") {
        return false;
    }

    SIGHT_PATH.is_match(url.path())
}
