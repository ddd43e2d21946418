//! Address extraction and validation
//!
//! Addresses are the least reliably marked-up field on detail pages, so the
//! extractor escalates through four strategies: precise selectors, keyword
//! anchored text, structured data, and finally free-text patterns over the
//! whole page. Every candidate must pass [`is_valid_address`].

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use super::{char_len, compile_selectors, element_text, text_nodes_containing, truncate_chars, visible_text};
use crate::model::UNKNOWN;

/// Terms that mark text as facility, contact or promo information
pub const ADDRESS_BLACKLIST: &[&str] = &[
    "母婴室",
    "卫生间",
    "停车场",
    "营业时间",
    "门票",
    "电话",
    "网址",
    "邮箱",
    "微信公众号",
    "二维码",
    "攻略",
    "旅游",
    "携程",
    "推荐",
    "大全",
    "打卡",
];

/// Patterns of which at least one must match a genuine address
pub const ADDRESS_SIGNALS: &[&str] = &[
    r"[省市县区镇乡村街道路巷号]",
    r"[东南西北]",
    r"[0-9]+号",
    r"[大学中学小学]",
    r"[公园广场景区景点]",
];

const PRECISE_SELECTORS: &[&str] = &[
    ".sight_detail_addr",
    ".sight-address .content",
    ".spot-address .text",
    ".detail-address",
    r#"[data-b*="address"]"#,
    ".address .text",
];

const ADDRESS_KEYWORDS: &[&str] = &["地址", "位置", "地点"];

const META_SELECTORS: &[&str] = &[
    r#"meta[name="address"]"#,
    r#"meta[name="location"]"#,
    r#"meta[property="address"]"#,
    r#"meta[property="location"]"#,
];

const FREE_TEXT_PATTERNS: &[&str] = &[
    r"地址[:：]\s*([^\n\r]{10,80})",
    r"位置[:：]\s*([^\n\r]{10,80})",
    r"地点[:：]\s*([^\n\r]{10,80})",
    r"位于([^\n\r]{10,80})",
    r"坐落于([^\n\r]{10,80})",
    r"地处([^\n\r]{10,80})",
];

const MIN_ADDRESS_CHARS: usize = 5;
const MAX_ADDRESS_CHARS: usize = 200;
const MAX_CLEAN_CHARS: usize = 100;

static BLACKLIST: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(ADDRESS_BLACKLIST.iter().map(|term| regex::escape(term))).unwrap()
});
static SIGNALS: Lazy<RegexSet> = Lazy::new(|| RegexSet::new(ADDRESS_SIGNALS).unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:地址|位置|地点)[:：]\s*").unwrap());

static KEYWORD_VALUE: Lazy<Vec<Regex>> = Lazy::new(|| {
    ADDRESS_KEYWORDS
        .iter()
        .map(|keyword| Regex::new(&format!(r"{}[:：]\s*([^\n\r]+)", keyword)).unwrap())
        .collect()
});
static FREE_TEXT: Lazy<Vec<Regex>> = Lazy::new(|| {
    FREE_TEXT_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

static PRECISE: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(PRECISE_SELECTORS));
static META: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(META_SELECTORS));
static JSON_LD: Lazy<Vec<Selector>> =
    Lazy::new(|| compile_selectors(&[r#"script[type="application/ld+json"]"#]));

/// Returns true if `text` looks like a postal address
///
/// ```
/// use sight_crawler::extract::is_valid_address;
///
/// assert!(is_valid_address("北京市东城区景山前街4号"));
/// assert!(!is_valid_address("母婴室在一楼"));
/// ```
pub fn is_valid_address(text: &str) -> bool {
    let len = char_len(text);
    if !(MIN_ADDRESS_CHARS..=MAX_ADDRESS_CHARS).contains(&len) {
        return false;
    }
    !BLACKLIST.is_match(text) && SIGNALS.is_match(text)
}

/// Normalizes whitespace, strips a leading label and caps the length
pub fn clean_address(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let unlabeled = LABEL.replace(collapsed.trim(), "");
    if char_len(&unlabeled) > MAX_CLEAN_CHARS {
        format!("{}...", truncate_chars(&unlabeled, MAX_CLEAN_CHARS))
    } else {
        unlabeled.into_owned()
    }
}

/// Extracts the attraction address, or [`UNKNOWN`]
pub fn extract_address(document: &Html) -> String {
    from_precise_selectors(document)
        .or_else(|| from_keyword_anchors(document))
        .or_else(|| from_structured_data(document))
        .or_else(|| from_free_text(document))
        .unwrap_or_else(|| {
            tracing::debug!("No address candidate survived validation");
            UNKNOWN.to_string()
        })
}

fn from_precise_selectors(document: &Html) -> Option<String> {
    super::first_valid_in(document, &PRECISE, |text| {
        is_valid_address(&text).then(|| clean_address(&text))
    })
}

fn from_keyword_anchors(document: &Html) -> Option<String> {
    ADDRESS_KEYWORDS
        .iter()
        .zip(KEYWORD_VALUE.iter())
        .find_map(|(keyword, pattern)| {
            text_nodes_containing(document, keyword)
                .into_iter()
                .find_map(|parent| anchored_value(parent, pattern))
        })
}

/// Value following a keyword label inside `parent`, or the next sibling's text
fn anchored_value(parent: ElementRef<'_>, pattern: &Regex) -> Option<String> {
    let full_text = element_text(parent);
    if let Some(value) = pattern.captures(&full_text).and_then(|caps| caps.get(1)) {
        let value = value.as_str().trim();
        if is_valid_address(value) {
            return Some(clean_address(value));
        }
    }

    let sibling = parent.next_siblings().find_map(ElementRef::wrap)?;
    let sibling_text = element_text(sibling);
    is_valid_address(&sibling_text).then(|| clean_address(&sibling_text))
}

/// Address candidates from JSON-LD blocks and meta tags, returned uncleaned
fn from_structured_data(document: &Html) -> Option<String> {
    let json_ld = JSON_LD
        .iter()
        .flat_map(|selector| document.select(selector))
        .filter_map(|script| {
            let raw: String = script.text().collect();
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Skipping malformed JSON-LD block: {}", e);
                    None
                }
            }
        })
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        })
        .filter_map(|item| json_ld_address(&item));

    let meta = META.iter().filter_map(|selector| {
        document
            .select(selector)
            .next()
            .and_then(|element| element.value().attr("content"))
            .map(str::to_string)
    });

    json_ld.chain(meta).find(|candidate| is_valid_address(candidate))
}

fn json_ld_address(item: &Value) -> Option<String> {
    match item.get("address")? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Object(fields) => {
            let field = |key: &str| {
                fields
                    .get(key)
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty())
            };
            match (field("streetAddress"), field("addressLocality"), field("addressRegion")) {
                (Some(street), _, _) => Some(street.to_string()),
                (None, Some(locality), Some(region)) => Some(format!("{}{}", locality, region)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn from_free_text(document: &Html) -> Option<String> {
    let text = visible_text(document);
    FREE_TEXT.iter().find_map(|pattern| {
        pattern
            .captures_iter(&text)
            .filter_map(|caps| caps.get(1))
            .map(|value| value.as_str())
            .find(|value| is_valid_address(value))
            .map(clean_address)
    })
}
