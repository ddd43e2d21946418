use crate::{UrlError, UrlResult};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Base used to resolve relative links found on listing pages
pub const SITE_BASE: &str = "https://you.ctrip.com";

/// Mobile host path that mirrors the primary site
const MOBILE_PREFIX: &str = "gs.ctrip.com/html5/you";

/// Primary host the mobile prefix is rewritten to
const PRIMARY_HOST: &str = "you.ctrip.com";

static PAGE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-p\d+\.html$").unwrap());

/// Normalizes a detail-page link to its canonical absolute form
///
/// # Normalization Steps
///
/// 1. Resolve relative links against the primary site
/// 2. Reject anything that is not HTTP(S) after resolution
/// 3. Enforce HTTPS
/// 4. Rewrite the mobile mirror (`gs.ctrip.com/html5/you`) to the primary host
/// 5. Remove the fragment
///
/// Query strings are kept: tracking parameters are rejected later by
/// [`is_valid_sight_url`](crate::url::is_valid_sight_url) rather than silently
/// stripped here.
///
/// Applying the function to its own output yields the same string.
///
/// # Examples
///
/// ```
/// use sight_crawler::url::normalize_sight_url;
///
/// let url = normalize_sight_url("/sight/beijing1/229.html").unwrap();
/// assert_eq!(url, "https://you.ctrip.com/sight/beijing1/229.html");
///
/// let url = normalize_sight_url("http://gs.ctrip.com/html5/you/sight/beijing1/229.html").unwrap();
/// assert_eq!(url, "https://you.ctrip.com/sight/beijing1/229.html");
/// ```
pub fn normalize_sight_url(href: &str) -> UrlResult<String> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::Parse("empty link".to_string()));
    }

    let base = Url::parse(SITE_BASE).map_err(|e| UrlError::Parse(e.to_string()))?;
    let mut url = base.join(href).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    if url.scheme() == "http" {
        url.set_scheme("https")
            .map_err(|_| UrlError::InvalidScheme("cannot upgrade to https".to_string()))?;
    }

    url.set_fragment(None);

    let serialized = url.to_string();
    if serialized.contains(MOBILE_PREFIX) {
        let rewritten = serialized.replacen(MOBILE_PREFIX, PRIMARY_HOST, 1);
        let url = Url::parse(&rewritten).map_err(|e| UrlError::Parse(e.to_string()))?;
        return Ok(url.to_string());
    }

    Ok(serialized)
}

/// Builds the URL of listing page `page` from a region's first listing page
///
/// Returns `None` when the URL carries no `-p<N>.html` marker.
///
/// ```
/// use sight_crawler::url::listing_page_url;
///
/// let page = listing_page_url("https://you.ctrip.com/sight/beijing1/s0-p1.html", 3);
/// assert_eq!(page.as_deref(), Some("https://you.ctrip.com/sight/beijing1/s0-p3.html"));
/// ```
pub fn listing_page_url(first_page: &str, page: u32) -> Option<String> {
    if !PAGE_MARKER.is_match(first_page) {
        return None;
    }
    let replacement = format!("-p{}.html", page);
    Some(
        PAGE_MARKER
            .replace(first_page, replacement.as_str())
            .into_owned(),
    )
}
