//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl run,
//! including crawl counters, rejection reasons, data quality and the files
//! that were written.

use crate::output::traits::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of `summary` to `output_path`
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Sight-Crawler Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    if summary.debug_trial {
        md.push_str("- **Mode**: debug trial\n");
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Crawl counters
    md.push_str("## Crawl Statistics\n\n");
    md.push_str(&format!(
        "- **Detail Links Discovered**: {}\n",
        summary.links_discovered
    ));
    md.push_str(&format!("- **Pages Attempted**: {}\n", summary.pages_attempted));
    md.push_str(&format!(
        "- **Records Assembled**: {}\n",
        summary.records_assembled
    ));
    md.push_str(&format!(
        "- **Records After Cleaning**: {} ({} dropped)\n",
        summary.records_cleaned,
        summary.records_dropped()
    ));
    md.push_str(&format!(
        "- **Reviews Collected**: {}\n",
        summary.reviews_collected
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    // Rejections
    if !summary.rejections.is_empty() {
        md.push_str("## Rejected Pages\n\n");
        md.push_str("| Reason | Count |\n");
        md.push_str("|--------|-------|\n");
        for (label, count) in &summary.rejections {
            md.push_str(&format!("| {} | {} |\n", label, count));
        }
        md.push('\n');
    }

    // Data quality
    let quality = &summary.quality;
    if quality.total > 0 {
        md.push_str("## Data Quality\n\n");
        md.push_str("| Field | Present | Share |\n");
        md.push_str("|-------|---------|-------|\n");
        for (field, count) in quality.completeness() {
            md.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                field,
                count,
                quality.percent(count)
            ));
        }
        md.push('\n');

        if let (Some(avg), Some(min), Some(max)) =
            (quality.rating_average, quality.rating_min, quality.rating_max)
        {
            md.push_str(&format!(
                "- **Rating**: avg {:.2}, min {:.1}, max {:.1}\n",
                avg, min, max
            ));
        }
        md.push_str(&format!(
            "- **Reviews**: {} total, {:.1} per attraction\n\n",
            quality.total_reviews,
            quality.average_reviews()
        ));

        md.push_str("### Rating Distribution\n\n");
        md.push_str("| Stars | Attractions |\n");
        md.push_str("|-------|-------------|\n");
        for (label, count) in quality.distribution.rows() {
            md.push_str(&format!("| {} | {} |\n", label, count));
        }
        md.push('\n');
    }

    // Files
    if !summary.files_written.is_empty() {
        md.push_str("## Files Written\n\n");
        for path in &summary.files_written {
            md.push_str(&format!("- {}\n", path.display()));
        }
        md.push('\n');
    }

    if !summary.save_failures.is_empty() {
        md.push_str("## Save Failures\n\n");
        for failure in &summary.save_failures {
            md.push_str(&format!("- {}\n", failure));
        }
        md.push('\n');
    }

    md
}
