use serde::{Deserialize, Serialize};

/// Sentinel meaning "this field could not be extracted"
///
/// Distinct from the empty string, which some fields use for "absent".
pub const UNKNOWN: &str = "未知";

/// User name given to reviews without an author
pub const ANONYMOUS: &str = "匿名用户";

/// One attraction extracted from a detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionRecord {
    /// Attraction name, trimmed, never the sentinel once assembled
    pub name: String,

    /// Rating in [0, 5]; 0 means unknown
    pub rating: f64,

    /// Validated address, or [`UNKNOWN`]
    pub address: String,

    /// Introduction text, possibly empty
    pub introduction: String,

    /// Number of reviews; signed so reloaded data with negatives can be rejected
    pub review_count: i64,

    /// Canonical detail-page URL
    pub url: String,

    /// City derived from the URL, possibly empty
    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl AttractionRecord {
    /// Returns true if the address field holds a real address
    pub fn has_address(&self) -> bool {
        !self.address.is_empty() && self.address != UNKNOWN
    }

    /// Returns true if the rating field holds a real rating
    pub fn has_rating(&self) -> bool {
        self.rating > 0.0
    }
}

/// One user review of an attraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub sight_name: String,
    pub user_name: String,
    /// Rating in [1, 5], or 0 when absent
    pub rating: f64,
    /// Review body, at most 500 characters
    pub content: String,
    /// `yyyy-mm-dd` when it could be derived, else the raw text
    pub date: String,
}
