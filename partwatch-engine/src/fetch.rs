//! Per-tick fan-out across the polled sources.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tracing::debug;

use partwatch_client::ClientError;
use partwatch_types::{CounterStatus, ErrorMarker, ErrorRecord, MachineId, Part, PartId};

use crate::sources::PartSources;

/// Everything one tick gathered, before merging.
///
/// The error-lists source is per-part fault tolerant, so it always yields
/// a marker map (degraded entries included). The machine-wide sources keep
/// their whole-source result; the merge step decides the fallback.
#[derive(Debug)]
pub struct SourceBatch {
    pub markers: BTreeMap<PartId, ErrorMarker>,
    pub counters: Result<Vec<CounterStatus>, ClientError>,
    pub recent: Result<Vec<ErrorRecord>, ClientError>,
}

/// Fetch error markers for every part concurrently.
///
/// One request per part; a failed or malformed response degrades only that
/// part's marker and never aborts the batch.
pub async fn fetch_error_markers<S: PartSources>(
    sources: &S,
    parts: &[Part],
    date_from: DateTime<Utc>,
) -> BTreeMap<PartId, ErrorMarker> {
    let lookups = parts.iter().map(|part| async move {
        let marker = match sources.error_codes(part.id, date_from).await {
            Ok(codes) => ErrorMarker::Codes(codes),
            Err(err) => {
                debug!(part_id = part.id, "error lookup degraded: {}", err);
                ErrorMarker::Unavailable(err.reason())
            }
        };
        (part.id, marker)
    });

    join_all(lookups).await.into_iter().collect()
}

/// Run one tick's fan-out: all three sources concurrently, no fail-fast.
///
/// Completes only once every source has settled, successfully or not.
pub async fn collect_batch<S: PartSources>(
    sources: &S,
    machine: MachineId,
    parts: &[Part],
    date_from: DateTime<Utc>,
) -> SourceBatch {
    let (markers, counters, recent) = tokio::join!(
        fetch_error_markers(sources, parts, date_from),
        sources.counters(machine),
        sources.recent_errors(machine),
    );

    SourceBatch {
        markers,
        counters,
        recent,
    }
}
