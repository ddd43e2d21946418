//! HTML parser for listing pages
//!
//! Listing pages link to many things besides attractions (food, shopping,
//! pagination, mobile mirrors). Only hrefs that normalize to a canonical
//! attraction detail page are kept.

use crate::url::accept_sight_link;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracts attraction detail links from a listing page
///
/// Links come back normalized, deduplicated and in first-seen order.
///
/// ```
/// use sight_crawler::crawler::discover_sight_links;
///
/// let html = r#"<a href="/sight/beijing1/229.html">故宫</a>
///               <a href="/sight/beijing1/229.html#top">故宫</a>
///               <a href="/sight/beijing1/s0-p2.html">下一页</a>"#;
/// assert_eq!(
///     discover_sight_links(html),
///     vec!["https://you.ctrip.com/sight/beijing1/229.html".to_string()]
/// );
/// ```
pub fn discover_sight_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        // Cheap pre-filter before normalization
        if !(href.contains("/sight/") && href.contains(".html")) {
            continue;
        }

        if let Some(url) = accept_sight_link(href) {
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }
    }

    links
}
