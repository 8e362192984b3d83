//! Error markers and error records.

use chrono::{DateTime, Utc};

use crate::PartId;

/// Per-part error state within a snapshot.
///
/// Either the list of error codes the backend reported for the part, or a
/// placeholder describing why the lookup failed. The two cases are a tagged
/// union so that a fetch failure can never masquerade as "no errors".
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorMarker {
    /// Error codes reported for the part. Empty means "no errors".
    Codes(Vec<String>),
    /// The lookup failed or returned an unusable payload; the string is a
    /// displayable reason.
    Unavailable(String),
}

impl ErrorMarker {
    /// Number of error codes, or `None` when the lookup was degraded.
    pub fn code_count(&self) -> Option<usize> {
        match self {
            ErrorMarker::Codes(codes) => Some(codes.len()),
            ErrorMarker::Unavailable(_) => None,
        }
    }

    /// Whether this marker represents a degraded lookup.
    pub fn is_degraded(&self) -> bool {
        matches!(self, ErrorMarker::Unavailable(_))
    }
}

/// Full detail of one recorded error, from the detail or recent-errors feed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorRecord {
    pub id: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub part_id: Option<PartId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub error_id: Option<i64>,
    pub error_code: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}
