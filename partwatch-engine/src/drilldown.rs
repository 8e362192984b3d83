//! On-demand error detail for a selected part.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use partwatch_types::{ErrorRecord, PartId, TimeRange};

use crate::sources::PartSources;

/// View state of the drill-down panel.
///
/// Kept separate from the snapshot: a failed or pending detail fetch never
/// touches the polled data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrilldownState {
    #[default]
    Idle,
    Loading {
        part_id: PartId,
    },
    Ready {
        part_id: PartId,
        records: Vec<ErrorRecord>,
    },
    Failed {
        part_id: PartId,
        reason: String,
    },
}

/// Fetches full error detail for one part, outside the polling cadence.
///
/// Requests are sequenced: issuing a new request invalidates the previous
/// one, and a response from an invalidated request is discarded when it
/// arrives. Only the most recent request ever updates the view.
#[derive(Debug)]
pub struct Drilldown<S> {
    sources: Arc<S>,
    seq: Arc<AtomicU64>,
    view: Arc<RwLock<DrilldownState>>,
}

impl<S> Clone for Drilldown<S> {
    fn clone(&self) -> Self {
        Self {
            sources: self.sources.clone(),
            seq: self.seq.clone(),
            view: self.view.clone(),
        }
    }
}

impl<S: PartSources> Drilldown<S> {
    pub fn new(sources: Arc<S>) -> Self {
        Self {
            sources,
            seq: Arc::new(AtomicU64::new(0)),
            view: Arc::new(RwLock::new(DrilldownState::Idle)),
        }
    }

    /// The current view state.
    pub fn view(&self) -> DrilldownState {
        self.view.read().clone()
    }

    /// Reset to idle and invalidate any in-flight request.
    pub fn clear(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        *self.view.write() = DrilldownState::Idle;
    }

    /// Fetch error detail for `part_id` over `range`.
    ///
    /// Last request wins: a response belonging to an earlier request is
    /// dropped on arrival, regardless of its outcome.
    pub fn request(&self, part_id: PartId, range: TimeRange) {
        let my_seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self.view.write() = DrilldownState::Loading { part_id };

        let sources = self.sources.clone();
        let seq = self.seq.clone();
        let view = self.view.clone();

        tokio::spawn(async move {
            let result = sources.error_detail(part_id, range.resolve_now()).await;

            if seq.load(Ordering::SeqCst) != my_seq {
                debug!(part_id, "discarding superseded drill-down response");
                return;
            }

            *view.write() = match result {
                Ok(records) => DrilldownState::Ready { part_id, records },
                Err(err) => DrilldownState::Failed {
                    part_id,
                    reason: err.reason(),
                },
            };
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{error_record, MockSources};
    use std::time::Duration;

    async fn settle() {
        // Lets spawned fetches run to completion under paused time.
        tokio::time::sleep(Duration::from_secs(60)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn successful_fetch_reaches_the_view() {
        let sources = Arc::new(MockSources::new());
        sources.set_error_detail(5, Ok(vec![error_record(1, "E01")]));

        let drilldown = Drilldown::new(sources);
        drilldown.request(5, TimeRange::Hours1);
        settle().await;

        match drilldown.view() {
            DrilldownState::Ready { part_id, records } => {
                assert_eq!(part_id, 5);
                assert_eq!(records.len(), 1);
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_scoped_to_the_view() {
        let sources = Arc::new(MockSources::new());
        sources.set_error_detail(5, Err("HTTP 500".into()));

        let drilldown = Drilldown::new(sources);
        drilldown.request(5, TimeRange::Hours1);
        settle().await;

        match drilldown.view() {
            DrilldownState::Failed { part_id, .. } => assert_eq!(part_id, 5),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn last_request_wins() {
        let sources = Arc::new(MockSources::new());
        // Part 5 answers slowly, part 7 quickly.
        sources.set_error_detail(5, Ok(vec![error_record(1, "OLD")]));
        sources.set_error_detail_delay(5, Duration::from_secs(10));
        sources.set_error_detail(7, Ok(vec![error_record(2, "NEW")]));

        let drilldown = Drilldown::new(sources);
        drilldown.request(5, TimeRange::Hours1);
        drilldown.request(7, TimeRange::Hours1);
        settle().await;

        // Part 5's slow response must not have overwritten part 7's.
        match drilldown.view() {
            DrilldownState::Ready { part_id, records } => {
                assert_eq!(part_id, 7);
                assert_eq!(records[0].error_code, "NEW");
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn clear_invalidates_in_flight_requests() {
        let sources = Arc::new(MockSources::new());
        sources.set_error_detail(5, Ok(vec![error_record(1, "E01")]));
        sources.set_error_detail_delay(5, Duration::from_secs(10));

        let drilldown = Drilldown::new(sources);
        drilldown.request(5, TimeRange::Hours1);
        drilldown.clear();
        settle().await;

        assert_eq!(drilldown.view(), DrilldownState::Idle);
    }
}
