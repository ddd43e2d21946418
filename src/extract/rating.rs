use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use super::{compile_selectors, first_valid_in};

const RATING_SELECTORS: &[&str] = &[
    ".score .textscore",
    ".avgScore",
    r#"[class*="score"] span"#,
    ".biz_summary .score",
    ".commentScore",
    ".comment_score",
];

const REVIEW_COUNT_SELECTORS: &[&str] = &[".reviewCount", ".commentCount", r#"[class*="review"]"#];

static RATING: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(RATING_SELECTORS));
static REVIEW_COUNT: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(REVIEW_COUNT_SELECTORS));

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9０-９]+").unwrap());

/// Parses the first number in `text` as a rating on the 1..=5 scale
///
/// ```
/// use sight_crawler::extract::parse_rating_text;
///
/// assert_eq!(parse_rating_text("用户评分：4.5分"), Some(4.5));
/// assert_eq!(parse_rating_text("6"), None);
/// ```
pub fn parse_rating_text(text: &str) -> Option<f64> {
    let value: f64 = DECIMAL.find(text)?.as_str().parse().ok()?;
    (1.0..=5.0).contains(&value).then_some(value)
}

/// Extracts the page rating, or 0.0 when none is usable
pub fn extract_rating(document: &Html) -> f64 {
    first_valid_in(document, &RATING, |text| parse_rating_text(&text)).unwrap_or(0.0)
}

/// Value of an ASCII or full-width digit run, saturating at `i64::MAX`
fn parse_count(digits: &str) -> i64 {
    digits
        .chars()
        .filter_map(|c| match c {
            '0'..='9' => c.to_digit(10),
            '０'..='９' => Some(c as u32 - '０' as u32),
            _ => None,
        })
        .fold(0i64, |count, digit| {
            count.saturating_mul(10).saturating_add(i64::from(digit))
        })
}

/// Extracts the review count, or 0
///
/// The first selector whose text holds a digit run decides the count.
pub fn extract_review_count(document: &Html) -> i64 {
    first_valid_in(document, &REVIEW_COUNT, |text| {
        DIGIT_RUN.find(&text).map(|run| parse_count(run.as_str()))
    })
    .unwrap_or(0)
}
