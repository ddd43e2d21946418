/// Outcome definitions for detail-page assembly
///
/// A detail page moves FETCH → PARSE → EXTRACT and ends either assembled
/// into a record or rejected with a reason.
use crate::model::AttractionRecord;
use std::fmt;

/// Why a detail page produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The fetcher gave up on the page
    FetchFailed,

    /// No name candidate survived the name cascade
    UnknownName,

    /// The extracted name carries a blacklisted substring
    BlacklistedName(String),

    /// An extractor panicked on unexpected markup
    ExtractionPanicked(String),
}

impl RejectReason {
    /// Short machine-friendly label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::FetchFailed => "fetch_failed",
            Self::UnknownName => "unknown_name",
            Self::BlacklistedName(_) => "blacklisted_name",
            Self::ExtractionPanicked(_) => "extraction_panicked",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed => write!(f, "page could not be fetched"),
            Self::UnknownName => write!(f, "no usable name"),
            Self::BlacklistedName(name) => write!(f, "name '{}' is blacklisted", name),
            Self::ExtractionPanicked(message) => write!(f, "extraction failed: {}", message),
        }
    }
}

/// Terminal result of processing one detail page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Assembled(AttractionRecord),
    Rejected(RejectReason),
}

impl PageOutcome {
    /// Returns true if a record was produced
    pub fn is_assembled(&self) -> bool {
        matches!(self, Self::Assembled(_))
    }

    /// Consumes the outcome, yielding the record if any
    pub fn into_record(self) -> Option<AttractionRecord> {
        match self {
            Self::Assembled(record) => Some(record),
            Self::Rejected(_) => None,
        }
    }
}
