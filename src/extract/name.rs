use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{char_len, compile_selectors, first_valid_in};
use crate::model::UNKNOWN;

/// Substrings marking a heading as a guide or promo page rather than an attraction
pub const NAME_BLACKLIST: &[&str] = &["攻略", "旅游", "携程", "推荐", "大全", "打卡"];

/// Heading selectors, most specific first
const NAME_SELECTORS: &[&str] = &[
    r#"h1[class*="detail"]"#,
    ".detailTitle",
    ".sight_detail_cntitle",
    "h1",
];

const MAX_NAME_CHARS: usize = 50;

static SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(NAME_SELECTORS));

/// Returns true if `name` carries a blacklisted substring
pub fn is_rejected_name(name: &str) -> bool {
    NAME_BLACKLIST.iter().any(|term| name.contains(term))
}

/// Extracts the attraction name, or [`UNKNOWN`]
pub fn extract_name(document: &Html) -> String {
    first_valid_in(document, &SELECTORS, |text| {
        let acceptable =
            !text.is_empty() && char_len(&text) < MAX_NAME_CHARS && !is_rejected_name(&text);
        acceptable.then_some(text)
    })
    .unwrap_or_else(|| UNKNOWN.to_string())
}
