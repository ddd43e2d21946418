//! Data model for crawl results
//!
//! - `AttractionRecord`: one attraction extracted from a detail page
//! - `ReviewRecord`: one user review of an attraction
//! - `PageOutcome`: terminal result of processing a detail page

mod page_outcome;
mod record;

// Re-export main types
pub use page_outcome::{PageOutcome, RejectReason};
pub use record::{AttractionRecord, ReviewRecord, ANONYMOUS, UNKNOWN};
