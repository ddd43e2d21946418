//! Data quality statistics over assembled records
//!
//! This module computes completeness and rating statistics for a batch of
//! attraction records and displays them.

use crate::model::{AttractionRecord, UNKNOWN};

/// Star buckets for the rating distribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingDistribution {
    pub five_star: u64,
    pub four_star: u64,
    pub three_star: u64,
    pub two_star: u64,
    pub one_star: u64,
}

impl RatingDistribution {
    fn add(&mut self, rating: f64) {
        let bucket = if rating >= 4.5 {
            &mut self.five_star
        } else if rating >= 3.5 {
            &mut self.four_star
        } else if rating >= 2.5 {
            &mut self.three_star
        } else if rating >= 1.5 {
            &mut self.two_star
        } else {
            &mut self.one_star
        };
        *bucket += 1;
    }

    /// Buckets from five stars down, with display labels
    pub fn rows(&self) -> [(&'static str, u64); 5] {
        [
            ("5★", self.five_star),
            ("4★", self.four_star),
            ("3★", self.three_star),
            ("2★", self.two_star),
            ("1★", self.one_star),
        ]
    }
}

/// Completeness and rating statistics for a batch of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataQuality {
    /// Total number of records inspected
    pub total: u64,

    // Completeness counts
    pub with_name: u64,
    pub with_rating: u64,
    pub with_address: u64,
    pub with_introduction: u64,

    /// Rating statistics over rated records only
    pub rating_average: Option<f64>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,

    pub total_reviews: i64,

    pub distribution: RatingDistribution,
}

impl DataQuality {
    /// Computes quality statistics for `records`
    pub fn from_records(records: &[AttractionRecord]) -> Self {
        let mut quality = Self {
            total: records.len() as u64,
            ..Self::default()
        };
        let mut rating_sum = 0.0;

        for record in records {
            if !record.name.is_empty() && record.name != UNKNOWN {
                quality.with_name += 1;
            }
            if record.has_address() {
                quality.with_address += 1;
            }
            if !record.introduction.is_empty() {
                quality.with_introduction += 1;
            }
            quality.total_reviews = quality.total_reviews.saturating_add(record.review_count);

            if record.has_rating() {
                quality.with_rating += 1;
                rating_sum += record.rating;
                quality.rating_min = Some(quality.rating_min.map_or(record.rating, |m| m.min(record.rating)));
                quality.rating_max = Some(quality.rating_max.map_or(record.rating, |m| m.max(record.rating)));
                quality.distribution.add(record.rating);
            }
        }

        if quality.with_rating > 0 {
            quality.rating_average = Some(rating_sum / quality.with_rating as f64);
        }

        quality
    }

    /// Average review count per record
    pub fn average_reviews(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.total_reviews as f64 / self.total as f64
    }

    /// Share of `count` in the total, in percent
    pub fn percent(&self, count: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (count as f64 / self.total as f64) * 100.0
    }

    /// Completeness rows with display labels
    pub fn completeness(&self) -> [(&'static str, u64); 4] {
        [
            ("name", self.with_name),
            ("rating", self.with_rating),
            ("address", self.with_address),
            ("introduction", self.with_introduction),
        ]
    }
}

/// Logs the quality report through `tracing`
pub fn log_quality(quality: &DataQuality) {
    tracing::info!("Data quality over {} records", quality.total);
    for (field, count) in quality.completeness() {
        tracing::info!("  {}: {}/{} ({:.1}%)", field, count, quality.total, quality.percent(count));
    }
    if let (Some(avg), Some(min), Some(max)) =
        (quality.rating_average, quality.rating_min, quality.rating_max)
    {
        tracing::info!("  rating avg {:.2}, min {:.1}, max {:.1}", avg, min, max);
    }
    tracing::info!(
        "  reviews total {}, avg {:.1}",
        quality.total_reviews,
        quality.average_reviews()
    );
}

/// Prints the quality report to stdout in a formatted manner
pub fn print_quality(quality: &DataQuality) {
    println!("=== Data Quality ===\n");

    println!("Completeness ({} records):", quality.total);
    for (field, count) in quality.completeness() {
        println!("  {}: {} ({:.1}%)", field, count, quality.percent(count));
    }
    println!();

    match (quality.rating_average, quality.rating_min, quality.rating_max) {
        (Some(avg), Some(min), Some(max)) => {
            println!("Ratings:");
            println!("  Average: {:.2}", avg);
            println!("  Range: {:.1} - {:.1}", min, max);
            println!();
            println!("Rating Distribution:");
            for (label, count) in quality.distribution.rows() {
                println!("  {}: {}", label, count);
            }
        }
        _ => println!("Ratings: none"),
    }
    println!();

    println!(
        "Reviews: {} total, {:.1} per attraction",
        quality.total_reviews,
        quality.average_reviews()
    );
}
