//! The aggregation step: one tick's results into one snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use partwatch_types::{ErrorMarker, Part, PartId, Snapshot, SourceId};

use crate::fetch::SourceBatch;

/// Merge one tick's fetch results with the previous snapshot into a new one.
///
/// Pure: no I/O and no failure mode of its own. The rules:
///
/// - per-part maps only ever hold ids present in the current catalog;
///   entries for removed parts are dropped here, including when falling
///   back to previous data
/// - a failed machine-wide source keeps the previous snapshot's values and
///   flags the source degraded
/// - the error-lists source is flagged degraded only when every part's
///   lookup failed; individual failures already sit in the marker map
pub fn merge(
    parts: Vec<Part>,
    batch: SourceBatch,
    previous: Option<&Snapshot>,
    fetched_at: DateTime<Utc>,
) -> Snapshot {
    let ids: std::collections::BTreeSet<PartId> = parts.iter().map(|p| p.id).collect();

    let errors_by_part: BTreeMap<PartId, ErrorMarker> = batch
        .markers
        .into_iter()
        .filter(|(id, _)| ids.contains(id))
        .collect();
    let errors_degraded =
        !errors_by_part.is_empty() && errors_by_part.values().all(|m| m.is_degraded());

    let (counters_by_part, counters_degraded) = match batch.counters {
        Ok(fresh) => (
            fresh
                .into_iter()
                .filter(|c| ids.contains(&c.part_id))
                .map(|c| (c.part_id, c))
                .collect(),
            false,
        ),
        Err(err) => {
            warn!(source = %SourceId::Counters, "source failed, keeping previous values: {}", err);
            let stale = previous
                .map(|prev| {
                    prev.counters_by_part
                        .iter()
                        .filter(|(id, _)| ids.contains(id))
                        .map(|(id, c)| (*id, c.clone()))
                        .collect()
                })
                .unwrap_or_default();
            (stale, true)
        }
    };

    let (recent_errors, recent_degraded) = match batch.recent {
        Ok(fresh) => (fresh, false),
        Err(err) => {
            warn!(source = %SourceId::RecentErrors, "source failed, keeping previous values: {}", err);
            let stale = previous.map(|prev| prev.recent_errors.clone()).unwrap_or_default();
            (stale, true)
        }
    };

    let source_degraded = BTreeMap::from([
        (SourceId::Errors, errors_degraded),
        (SourceId::Counters, counters_degraded),
        (SourceId::RecentErrors, recent_degraded),
    ]);

    Snapshot {
        parts,
        errors_by_part,
        counters_by_part,
        recent_errors,
        source_degraded,
        fetched_at,
    }
}
