//! Output module for persisting crawl results and reports
//!
//! This module handles:
//! - Writing cleaned records as JSON and CSV data files
//! - Reloading earlier data files and listing recent ones
//! - Computing data quality statistics
//! - Generating markdown summaries of crawl runs

mod file_store;
mod markdown;
pub mod stats;
mod traits;

pub use file_store::{FileStore, REVIEWS_ENTITY, SIGHTS_ENTITY, TAG_SEPARATOR};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{log_quality, print_quality, DataQuality, RatingDistribution};
pub use traits::{
    default_file_name, CrawlSummary, OutputError, OutputHandler, OutputResult, SavedFiles,
};
