use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{char_len, compile_selectors, first_valid, parse_rating_text, truncate_chars};
use crate::model::{ReviewRecord, ANONYMOUS};

/// Upper bound on reviews taken from a single review page
pub const MAX_REVIEWS_PER_PAGE: usize = 10;

const CONTAINER_SELECTORS: &[&str] = &[
    ".commentItem",
    ".review-item",
    ".comment-list li",
    ".user-comment",
];
const USER_SELECTORS: &[&str] = &[".user-name", ".username", ".name", r#"[class*="user"]"#];
const RATING_SELECTORS: &[&str] = &[".rating", ".score", r#"[class*="rating"]"#, r#"[class*="score"]"#];
const CONTENT_SELECTORS: &[&str] = &[".content", ".comment-content", ".text", ".review-text"];
const TIME_SELECTORS: &[&str] = &[".time", ".date", ".review-time", r#"[class*="time"]"#];

const MIN_CONTENT_CHARS: usize = 5;
const MAX_CONTENT_CHARS: usize = 500;

/// Month length used for "N个月前" style dates
const DAYS_PER_MONTH: u64 = 30;

static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(CONTAINER_SELECTORS));
static USER: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(USER_SELECTORS));
static RATING: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(RATING_SELECTORS));
static CONTENT: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(CONTENT_SELECTORS));
static TIME: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(TIME_SELECTORS));

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());
static COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Parses up to `max` reviews from a review page
///
/// The first container selector that matches anything decides which
/// elements are reviews; later selectors are not consulted. Reviews
/// without usable content are dropped.
pub fn parse_reviews(html: &str, sight_name: &str, max: usize, today: NaiveDate) -> Vec<ReviewRecord> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let Some(items) = CONTAINERS.iter().find_map(|selector| {
        let items: Vec<ElementRef<'_>> = root.select(selector).collect();
        (!items.is_empty()).then_some(items)
    }) else {
        tracing::debug!("No review containers found for {}", sight_name);
        return Vec::new();
    };

    items
        .into_iter()
        .take(max)
        .filter_map(|item| parse_single_review(item, sight_name, today))
        .collect()
}

fn parse_single_review(item: ElementRef<'_>, sight_name: &str, today: NaiveDate) -> Option<ReviewRecord> {
    let content = first_valid(item, &CONTENT, |text| {
        (char_len(&text) > MIN_CONTENT_CHARS).then(|| truncate_chars(&text, MAX_CONTENT_CHARS))
    })?;

    let user_name = first_valid(item, &USER, |text| (!text.is_empty()).then_some(text))
        .unwrap_or_else(|| ANONYMOUS.to_string());
    let rating = first_valid(item, &RATING, |text| parse_rating_text(&text)).unwrap_or(0.0);
    let date = first_valid(item, &TIME, |text| Some(normalize_review_date(&text, today)))
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());

    Some(ReviewRecord {
        sight_name: sight_name.to_string(),
        user_name,
        rating,
        content,
        date,
    })
}

/// Normalizes a review timestamp to `yyyy-mm-dd` where possible
///
/// Absolute dates pass through unchanged, `N天前` and `N个月前` are resolved
/// against `today` (a month counts as 30 days), anything else is returned raw.
///
/// ```
/// use chrono::NaiveDate;
/// use sight_crawler::extract::normalize_review_date;
///
/// let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
/// assert_eq!(normalize_review_date("3天前", today), "2024-05-07");
/// ```
pub fn normalize_review_date(text: &str, today: NaiveDate) -> String {
    if ISO_DATE.is_match(text) {
        return text.to_string();
    }

    let days_back = if text.contains("天前") {
        leading_count(text)
    } else if text.contains("月前") {
        leading_count(text).and_then(|months| months.checked_mul(DAYS_PER_MONTH))
    } else {
        None
    };

    days_back
        .and_then(|days| today.checked_sub_days(Days::new(days)))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| text.to_string())
}

fn leading_count(text: &str) -> Option<u64> {
    COUNT.find(text)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_relative_days() {
        assert_eq!(normalize_review_date("3天前", today()), "2024-05-07");
    }

    #[test]
    fn test_relative_months_are_thirty_days() {
        assert_eq!(normalize_review_date("2个月前", today()), "2024-03-11");
    }

    #[test]
    fn test_absolute_and_unrecognized_dates_pass_through() {
        assert_eq!(normalize_review_date("2023-10-01 12:30", today()), "2023-10-01 12:30");
        assert_eq!(normalize_review_date("昨天", today()), "昨天");
        assert_eq!(normalize_review_date("几天前", today()), "几天前");
    }

    #[test]
    fn test_parse_reviews_fields_and_defaults() {
        let html = r#"<html><body><ul>
            <li class="commentItem">
                <span class="user-name">小王</span>
                <span class="score">5分</span>
                <div class="content">非常壮观，值得一去，建议早点到。</div>
                <span class="time">2024-04-01</span>
            </li>
            <li class="commentItem">
                <div class="content">人很多，但是风景不错的地方。</div>
            </li>
            <li class="commentItem">
                <span class="user-name">小李</span>
                <div class="content">不错</div>
            </li>
        </ul></body></html>"#;

        let reviews = parse_reviews(html, "故宫", MAX_REVIEWS_PER_PAGE, today());
        assert_eq!(reviews.len(), 2);

        assert_eq!(reviews[0].sight_name, "故宫");
        assert_eq!(reviews[0].user_name, "小王");
        assert_eq!(reviews[0].rating, 5.0);
        assert_eq!(reviews[0].date, "2024-04-01");

        assert_eq!(reviews[1].user_name, ANONYMOUS);
        assert_eq!(reviews[1].rating, 0.0);
        assert_eq!(reviews[1].date, "2024-05-10");
    }

    #[test]
    fn test_parse_reviews_caps_count_and_uses_first_container_kind() {
        let item = r#"<div class="review-item"><p class="text">这是一条足够长的评论内容。</p></div>"#;
        let html = format!(
            "<html><body>{}<div class=\"user-comment\"><p class=\"text\">另一种容器里的评论内容。</p></div></body></html>",
            item.repeat(15)
        );

        let reviews = parse_reviews(&html, "外滩", MAX_REVIEWS_PER_PAGE, today());
        assert_eq!(reviews.len(), MAX_REVIEWS_PER_PAGE);
        assert!(reviews.iter().all(|r| r.content == "这是一条足够长的评论内容。"));
    }

    #[test]
    fn test_parse_reviews_without_containers() {
        assert!(parse_reviews("<html><body></body></html>", "故宫", 10, today()).is_empty());
    }
}
