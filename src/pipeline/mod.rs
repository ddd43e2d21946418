//! Cleaning and deduplication of assembled records
//!
//! Records pass three stages in order: a validity filter, deduplication by
//! trimmed name (the first occurrence wins) and field normalization. Input
//! order is preserved for the records that survive.

use crate::model::{AttractionRecord, UNKNOWN};
use std::collections::HashSet;

/// Longest introduction kept after cleaning
pub const MAX_CLEAN_INTRO_CHARS: usize = 500;

/// Returns true if a record may enter the cleaned output
///
/// Rejects a blank or unknown name, a rating outside [0, 5] (NaN included)
/// and a negative review count.
pub fn is_valid_record(record: &AttractionRecord) -> bool {
    let name = record.name.trim();
    if name.is_empty() || name == UNKNOWN {
        return false;
    }
    if !(0.0..=5.0).contains(&record.rating) {
        return false;
    }
    record.review_count >= 0
}

/// Trims text fields and caps the introduction length
pub fn normalize_record(mut record: AttractionRecord) -> AttractionRecord {
    record.name = record.name.trim().to_string();
    record.address = record.address.trim().to_string();
    record.introduction = record
        .introduction
        .trim()
        .chars()
        .take(MAX_CLEAN_INTRO_CHARS)
        .collect();
    record
}

/// Filters, deduplicates and normalizes `records`
pub fn clean_records(records: Vec<AttractionRecord>) -> Vec<AttractionRecord> {
    let total = records.len();
    let mut seen = HashSet::new();
    let mut invalid = 0usize;
    let mut duplicates = 0usize;

    let cleaned: Vec<AttractionRecord> = records
        .into_iter()
        .filter(|record| {
            let valid = is_valid_record(record);
            if !valid {
                tracing::debug!("Dropping invalid record '{}' ({})", record.name, record.url);
                invalid += 1;
            }
            valid
        })
        .filter(|record| {
            let first = seen.insert(record.name.trim().to_string());
            if !first {
                tracing::debug!("Dropping duplicate record '{}'", record.name);
                duplicates += 1;
            }
            first
        })
        .map(normalize_record)
        .collect();

    tracing::info!(
        "Cleaned {} records: {} kept, {} invalid, {} duplicates",
        total,
        cleaned.len(),
        invalid,
        duplicates
    );
    cleaned
}
