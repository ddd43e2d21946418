//! Heuristic field extraction from attraction pages
//!
//! Every extractor is a cascade: an ordered list of attempts (CSS selectors or
//! regular expressions) tried left to right, stopping at the first candidate
//! that passes the field's validation. When nothing passes, the extractor
//! returns its sentinel instead of failing.
//!
//! Extractors are pure functions of a parsed [`scraper::Html`] document and
//! share no state, so they can run in any order.

mod address;
mod intro;
mod name;
mod rating;
mod review;

pub use address::{
    clean_address, extract_address, is_valid_address, ADDRESS_BLACKLIST, ADDRESS_SIGNALS,
};
pub use intro::extract_introduction;
pub use name::{extract_name, is_rejected_name, NAME_BLACKLIST};
pub use rating::{extract_rating, extract_review_count, parse_rating_text};
pub use review::{normalize_review_date, parse_reviews, MAX_REVIEWS_PER_PAGE};

use scraper::{ElementRef, Html, Node, Selector};

/// Compiles a list of CSS selectors, skipping (and logging) invalid ones
pub(crate) fn compile_selectors(sources: &[&str]) -> Vec<Selector> {
    sources
        .iter()
        .filter_map(|source| match Selector::parse(source) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!("Skipping invalid selector {}: {:?}", source, e);
                None
            }
        })
        .collect()
}

/// Trimmed concatenated text of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Runs a selector cascade below `scope`
///
/// For each selector in order, the first matching element's text is handed
/// to `check`; the first `Some` wins.
pub(crate) fn first_valid<T, F>(scope: ElementRef<'_>, selectors: &[Selector], check: F) -> Option<T>
where
    F: Fn(String) -> Option<T>,
{
    selectors.iter().find_map(|selector| {
        scope
            .select(selector)
            .next()
            .map(element_text)
            .and_then(&check)
    })
}

/// Runs a selector cascade over a whole document
pub(crate) fn first_valid_in<T, F>(document: &Html, selectors: &[Selector], check: F) -> Option<T>
where
    F: Fn(String) -> Option<T>,
{
    first_valid(document.root_element(), selectors, check)
}

/// Number of Unicode scalar values in `text`
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Keeps at most `max` characters of `text`
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Returns true for elements whose text is never rendered
fn is_hidden_element(node: &Node) -> bool {
    node.as_element()
        .map(|element| matches!(element.name(), "script" | "style" | "noscript" | "template"))
        .unwrap_or(false)
}

/// Visible text of a document, text nodes joined in document order
pub(crate) fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.root_element().descendants() {
        if let Some(fragment) = node.value().as_text() {
            if !node.ancestors().any(|a| is_hidden_element(a.value())) {
                text.push_str(fragment);
            }
        }
    }
    text
}

/// Parent elements of the visible text nodes containing `needle`
pub(crate) fn text_nodes_containing<'a>(
    document: &'a Html,
    needle: &str,
) -> Vec<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter(|node| {
            node.value()
                .as_text()
                .map(|fragment| fragment.contains(needle))
                .unwrap_or(false)
        })
        .filter(|node| !node.ancestors().any(|a| is_hidden_element(a.value())))
        .filter_map(|node| node.parent().and_then(ElementRef::wrap))
        .collect()
}
