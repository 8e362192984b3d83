//! Inventory counter state for a part.

use crate::PartId;

/// Counter value reported by the backend when stock is low but not empty.
///
/// The counters endpoint reports a real piece count when stock is healthy,
/// `-1` when the level has fallen below the reorder threshold, and sets
/// `is_empty` when the feeder has run dry. The two signals are independent
/// on the wire; [`CounterStatus::fill_level`] applies the precedence the
/// backend expects consumers to use.
pub const LOW_STOCK_SENTINEL: i64 = -1;

/// Inventory state of a single part, as reported by the counters endpoint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterStatus {
    pub part_id: PartId,
    pub name: String,
    pub counter: i64,
    pub is_empty: bool,
}

impl CounterStatus {
    /// Classify the counter into a displayable fill level.
    ///
    /// `is_empty` wins over the `-1` sentinel when both are set.
    pub fn fill_level(&self) -> FillLevel {
        if self.is_empty {
            FillLevel::Empty
        } else if self.counter == LOW_STOCK_SENTINEL {
            FillLevel::Low
        } else {
            FillLevel::Stocked
        }
    }

    /// The piece count, if the backend reported a real one.
    pub fn piece_count(&self) -> Option<i64> {
        (self.counter >= 0).then_some(self.counter)
    }
}

/// Displayable classification of a part's inventory level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FillLevel {
    Stocked,
    Low,
    Empty,
}

impl FillLevel {
    /// Short label for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            FillLevel::Stocked => "OK",
            FillLevel::Low => "LOW",
            FillLevel::Empty => "EMPTY",
        }
    }
}
