use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{char_len, compile_selectors, first_valid_in, truncate_chars};

const INTRO_SELECTORS: &[&str] = &[
    ".summary",
    ".introduction",
    ".sight_detail_intro",
    ".mod_intro .text_style",
];

const MIN_INTRO_CHARS: usize = 10;
const MAX_INTRO_CHARS: usize = 300;

static SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(INTRO_SELECTORS));

/// Extracts the introduction, truncated to 300 characters; empty when absent
pub fn extract_introduction(document: &Html) -> String {
    first_valid_in(document, &SELECTORS, |text| {
        (char_len(&text) > MIN_INTRO_CHARS).then(|| truncate_chars(&text, MAX_INTRO_CHARS))
    })
    .unwrap_or_default()
}
