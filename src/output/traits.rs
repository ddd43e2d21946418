//! Output handler traits and types
//!
//! This module defines the trait interface for record sinks and the data
//! structures describing a finished crawl run.

use crate::model::{AttractionRecord, ReviewRecord};
use crate::output::stats::DataQuality;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Builds the default data file name, `{entity}_data_{YYYYMMDD_HHMMSS}.{ext}`
///
/// ```
/// use chrono::NaiveDate;
/// use sight_crawler::output::default_file_name;
///
/// let at = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap().and_hms_opt(8, 3, 9).unwrap();
/// assert_eq!(default_file_name("sights", "json", at), "sights_data_20240510_080309.json");
/// ```
pub fn default_file_name(entity: &str, extension: &str, at: NaiveDateTime) -> String {
    format!("{}_data_{}.{}", entity, at.format("%Y%m%d_%H%M%S"), extension)
}

/// Files written for one entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedFiles {
    pub json: Option<PathBuf>,
    /// Absent when there were no rows to write
    pub csv: Option<PathBuf>,
}

impl SavedFiles {
    /// All written paths, JSON first
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.json.iter().chain(self.csv.iter())
    }
}

/// Summary of a finished crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub config_hash: String,
    pub debug_trial: bool,

    // Crawl counters
    pub links_discovered: u64,
    pub pages_attempted: u64,
    pub records_assembled: u64,
    pub records_cleaned: u64,
    pub reviews_collected: u64,

    /// Rejection label -> count
    pub rejections: BTreeMap<String, u64>,

    pub quality: DataQuality,

    pub files_written: Vec<PathBuf>,
    /// Saves that failed, as `entity: error`
    pub save_failures: Vec<String>,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one rejected page under its label
    pub fn record_rejection(&mut self, label: &str) {
        *self.rejections.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Total number of rejected pages
    pub fn total_rejections(&self) -> u64 {
        self.rejections.values().sum()
    }

    /// Returns the share of attempted pages that produced a record, in percent
    pub fn success_rate(&self) -> f64 {
        if self.pages_attempted == 0 {
            return 0.0;
        }
        (self.records_assembled as f64 / self.pages_attempted as f64) * 100.0
    }

    /// Number of assembled records dropped by cleaning
    pub fn records_dropped(&self) -> u64 {
        self.records_assembled.saturating_sub(self.records_cleaned)
    }
}

/// Trait for record sinks
///
/// A sink persists cleaned attraction records and reviews. Empty review
/// batches are skipped entirely.
pub trait OutputHandler {
    /// Persists attraction records
    fn save_sights(&self, records: &[AttractionRecord]) -> OutputResult<SavedFiles>;

    /// Persists reviews
    fn save_reviews(&self, reviews: &[ReviewRecord]) -> OutputResult<SavedFiles>;
}
