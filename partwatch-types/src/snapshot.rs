//! Snapshot - the merged, immutable view of one machine across all sources.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::{CounterStatus, ErrorMarker, ErrorRecord, Part, PartId};

/// One of the independently polled backend sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SourceId {
    Errors,
    Counters,
    RecentErrors,
}

impl SourceId {
    /// All polled sources.
    pub const ALL: [SourceId; 3] = [SourceId::Errors, SourceId::Counters, SourceId::RecentErrors];
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceId::Errors => "errors",
            SourceId::Counters => "counters",
            SourceId::RecentErrors => "recent_errors",
        };
        f.write_str(name)
    }
}

/// A point-in-time view of one machine, merged from all polled sources.
///
/// Snapshots are built by the aggregator once per polling tick and published
/// atomically; a published snapshot is never mutated. Per-part maps are
/// keyed by part id and always hold a subset of the catalog's ids. Rendering
/// order follows `parts` (catalog order), not map order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// The part catalog, in catalog order.
    pub parts: Vec<Part>,

    /// Per-part error state. A missing key means the part has no data yet.
    pub errors_by_part: BTreeMap<PartId, ErrorMarker>,

    /// Per-part inventory counters.
    pub counters_by_part: BTreeMap<PartId, CounterStatus>,

    /// The machine-wide recent error feed, newest first as the backend
    /// returns it.
    pub recent_errors: Vec<ErrorRecord>,

    /// Which sources fell back to stale data this tick.
    pub source_degraded: BTreeMap<SourceId, bool>,

    /// When the tick that produced this snapshot completed.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// An empty snapshot with no parts and all sources healthy.
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            parts: Vec::new(),
            errors_by_part: BTreeMap::new(),
            counters_by_part: BTreeMap::new(),
            recent_errors: Vec::new(),
            source_degraded: SourceId::ALL.iter().map(|s| (*s, false)).collect(),
            fetched_at,
        }
    }

    /// The error marker for a part, if one was recorded.
    pub fn marker(&self, part: PartId) -> Option<&ErrorMarker> {
        self.errors_by_part.get(&part)
    }

    /// The counter status for a part, if one was recorded.
    pub fn counter(&self, part: PartId) -> Option<&CounterStatus> {
        self.counters_by_part.get(&part)
    }

    /// Whether the given source served stale data this tick.
    pub fn is_degraded(&self, source: SourceId) -> bool {
        self.source_degraded.get(&source).copied().unwrap_or(false)
    }

    /// Whether any source served stale data this tick.
    pub fn any_degraded(&self) -> bool {
        SourceId::ALL.iter().any(|s| self.is_degraded(*s))
    }

    /// Parts paired with their error marker, in catalog order.
    pub fn parts_with_markers(&self) -> impl Iterator<Item = (&Part, Option<&ErrorMarker>)> {
        self.parts.iter().map(|p| (p, self.errors_by_part.get(&p.id)))
    }
}
