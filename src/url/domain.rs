use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sight_crawler::url::extract_domain;
///
/// let url = Url::parse("https://YOU.CTRIP.COM/sight/beijing1/229.html").unwrap();
/// assert_eq!(extract_domain(&url), Some("you.ctrip.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
