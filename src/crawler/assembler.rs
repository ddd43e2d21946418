//! Detail-page record assembly
//!
//! Turns one fetched detail page into a [`PageOutcome`]. All field
//! extraction happens inside a panic boundary so a pathological page is
//! rejected instead of taking the crawl down.

use crate::extract::{
    extract_address, extract_introduction, extract_name, extract_rating, extract_review_count,
    is_rejected_name,
};
use crate::model::{AttractionRecord, PageOutcome, RejectReason, UNKNOWN};
use crate::url::city_from_url;
use scraper::Html;
use std::panic::{self, AssertUnwindSafe};

/// Parses a detail page and assembles an attraction record
///
/// The name gate runs first: a page without a usable name is rejected
/// before any other field is extracted.
pub fn assemble_record(html: &str, url: &str) -> PageOutcome {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| extract_record(html, url)))
        .unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            PageOutcome::Rejected(RejectReason::ExtractionPanicked(message))
        });

    match &outcome {
        PageOutcome::Assembled(record) => {
            tracing::info!("Assembled {} ({})", record.name, url);
        }
        PageOutcome::Rejected(reason) => {
            tracing::warn!("Rejected {} [{}]: {}", url, reason.label(), reason);
        }
    }

    outcome
}

fn extract_record(html: &str, url: &str) -> PageOutcome {
    let document = Html::parse_document(html);

    let name = extract_name(&document);
    if name == UNKNOWN {
        return PageOutcome::Rejected(RejectReason::UnknownName);
    }
    if is_rejected_name(&name) {
        return PageOutcome::Rejected(RejectReason::BlacklistedName(name));
    }

    PageOutcome::Assembled(AttractionRecord {
        rating: extract_rating(&document),
        address: extract_address(&document),
        introduction: extract_introduction(&document),
        review_count: extract_review_count(&document),
        url: url.to_string(),
        city: city_from_url(url).to_string(),
        tags: Vec::new(),
        name,
    })
}
