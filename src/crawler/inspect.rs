//! Page inspection for diagnosing extraction problems
//!
//! Detail pages: lists every element that could plausibly hold the name,
//! rating or address, next to what the extractors actually chose.
//!
//! Listing pages: runs every attraction-looking link through normalization
//! and validation and reports which ones survive.

use crate::extract::{
    char_len, element_text, extract_address, extract_introduction, extract_name, extract_rating,
    extract_review_count, text_nodes_containing, truncate_chars,
};
use crate::url::{is_valid_sight_url, normalize_sight_url};
use scraper::{ElementRef, Html, Selector};

const NAME_SELECTORS: &str = "h1, .detailTitle, .sight_detail_cntitle, title";
const RATING_SELECTORS: &str = r#"[class*="score"], [class*="rating"], .avgScore, .commentScore"#;

/// Blocks that tend to carry the address somewhere in their text
const ADDRESS_BLOCK_SELECTORS: &[&str] = &[
    ".sight_detail_addr",
    ".address",
    r#"[class*="address"]"#,
    ".sight_detail_info",
    ".mod_intro",
    ".detailLayout",
    ".baseInfo",
    ".sight_info",
    ".spot-address",
    ".location-info",
    ".detail-address",
    ".sight-address",
    ".text_item",
    ".text-style",
    ".content",
    ".info-item",
    ".detail-info",
    ".sight-detail-address",
];

const ADDRESS_KEYWORDS: &[&str] = &["地址", "位置"];

/// Address block candidates outside this char range are noise
const MIN_BLOCK_CHARS: usize = 6;
const MAX_BLOCK_CHARS: usize = 199;

/// Keyword parents need more than this many chars
const MIN_KEYWORD_CHARS: usize = 10;

/// Listing links inspected per page
pub const MAX_INSPECTED_LINKS: usize = 100;

const LINK_TEXT_CHARS: usize = 30;

/// An element that could hold a field value
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// `tag.class1.class2`, or the selector that found it
    pub element: String,
    pub text: String,
}

/// Extraction results for one page, with the raw candidates behind them
#[derive(Debug, Clone)]
pub struct PageInspection {
    pub name_candidates: Vec<Candidate>,
    pub rating_candidates: Vec<Candidate>,
    /// Address-like blocks, labelled by the selector that matched
    pub address_candidates: Vec<Candidate>,
    /// Parents of text nodes mentioning 地址 or 位置
    pub keyword_candidates: Vec<Candidate>,
    pub name: String,
    pub rating: f64,
    pub address: String,
    pub review_count: i64,
    pub introduction: String,
}

/// A link found on a listing page
#[derive(Debug, Clone, PartialEq)]
pub struct LinkCandidate {
    /// Normalized URL, or the raw href when it could not be normalized
    pub url: String,
    pub text: String,
}

/// Link filter verdicts for one listing page
#[derive(Debug, Clone, Default)]
pub struct ListingInspection {
    pub title: Option<String>,
    pub accepted: Vec<LinkCandidate>,
    pub rejected: Vec<LinkCandidate>,
}

fn describe(element: ElementRef<'_>) -> Candidate {
    let value = element.value();
    let mut label = value.name().to_string();
    for class in value.classes() {
        label.push('.');
        label.push_str(class);
    }
    Candidate {
        element: label,
        text: element_text(element),
    }
}

fn parse_selector(source: &str) -> Option<Selector> {
    match Selector::parse(source) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!("Invalid inspection selector {}: {:?}", source, e);
            None
        }
    }
}

fn candidates(document: &Html, selectors: &str) -> Vec<Candidate> {
    parse_selector(selectors)
        .map(|selector| document.select(&selector).map(describe).collect())
        .unwrap_or_default()
}

fn address_candidates(document: &Html) -> Vec<Candidate> {
    let mut found = Vec::new();
    for source in ADDRESS_BLOCK_SELECTORS {
        let Some(selector) = parse_selector(source) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element_text(element);
            if (MIN_BLOCK_CHARS..=MAX_BLOCK_CHARS).contains(&char_len(&text)) {
                found.push(Candidate {
                    element: source.to_string(),
                    text,
                });
            }
        }
    }
    found
}

fn keyword_candidates(document: &Html) -> Vec<Candidate> {
    ADDRESS_KEYWORDS
        .iter()
        .flat_map(|keyword| text_nodes_containing(document, keyword))
        .map(describe)
        .filter(|candidate| char_len(&candidate.text) > MIN_KEYWORD_CHARS)
        .collect()
}

/// Runs every extractor over `html` and gathers the candidates behind them
pub fn inspect_page(html: &str) -> PageInspection {
    let document = Html::parse_document(html);

    PageInspection {
        name_candidates: candidates(&document, NAME_SELECTORS),
        rating_candidates: candidates(&document, RATING_SELECTORS),
        address_candidates: address_candidates(&document),
        keyword_candidates: keyword_candidates(&document),
        name: extract_name(&document),
        rating: extract_rating(&document),
        address: extract_address(&document),
        review_count: extract_review_count(&document),
        introduction: extract_introduction(&document),
    }
}

/// Sorts the first [`MAX_INSPECTED_LINKS`] `/sight/` links of a listing page
/// into accepted and rejected
pub fn inspect_listing(html: &str) -> ListingInspection {
    let document = Html::parse_document(html);
    let mut inspection = ListingInspection {
        title: candidates(&document, "title")
            .into_iter()
            .next()
            .map(|candidate| candidate.text),
        ..ListingInspection::default()
    };

    let Some(selector) = parse_selector("a[href]") else {
        return inspection;
    };

    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href").map(|href| (href, element)))
        .filter(|(href, _)| href.contains("/sight/"))
        .take(MAX_INSPECTED_LINKS);

    for (href, element) in links {
        let text = truncate_chars(&element_text(element), LINK_TEXT_CHARS);
        match normalize_sight_url(href) {
            Ok(url) if is_valid_sight_url(&url) => {
                inspection.accepted.push(LinkCandidate { url, text })
            }
            Ok(url) => inspection.rejected.push(LinkCandidate { url, text }),
            Err(_) => inspection.rejected.push(LinkCandidate {
                url: href.to_string(),
                text,
            }),
        }
    }

    inspection
}

fn print_candidates(heading: &str, candidates: &[Candidate]) {
    println!("{}:", heading);
    if candidates.is_empty() {
        println!("  (none)");
    }
    for candidate in candidates {
        println!("  - {}: {}", candidate.element, candidate.text);
    }
    println!();
}

/// Prints a detail page inspection to stdout
pub fn print_inspection(url: &str, inspection: &PageInspection) {
    println!("=== Page Inspection: {} ===\n", url);

    print_candidates("Name candidates", &inspection.name_candidates);
    print_candidates("Rating candidates", &inspection.rating_candidates);
    print_candidates("Address blocks", &inspection.address_candidates);
    print_candidates("Elements mentioning 地址/位置", &inspection.keyword_candidates);

    println!("Extracted:");
    println!("  name: {}", inspection.name);
    println!("  rating: {}", inspection.rating);
    println!("  address: {}", inspection.address);
    println!("  review count: {}", inspection.review_count);
    println!("  introduction: {}", inspection.introduction);
}

/// Prints a listing page inspection to stdout
pub fn print_listing_inspection(url: &str, inspection: &ListingInspection) {
    println!("=== Listing Inspection: {} ===\n", url);
    println!(
        "Title: {}\n",
        inspection.title.as_deref().unwrap_or("(no title)")
    );

    for link in &inspection.accepted {
        println!("  ✓ {} - {}", link.url, link.text);
    }
    for link in &inspection.rejected {
        println!("  ✗ {} - {}", link.url, link.text);
    }

    println!("\nAccepted: {}", inspection.accepted.len());
    println!("Rejected: {}", inspection.rejected.len());
}
