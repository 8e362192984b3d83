//! Scripted [`PartSources`] implementation for engine tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use partwatch_client::ClientError;
use partwatch_types::{CounterStatus, ErrorRecord, MachineId, Part, PartId};

use crate::sources::PartSources;

/// A `PartSources` whose responses, failures and latencies are scripted.
///
/// Machine-wide sources take a queue of responses, one per tick, with the
/// last entry repeating; per-part sources take one response per part.
/// Delays use the tokio clock, so paused-time tests stay deterministic.
pub struct MockSources {
    catalog: Mutex<HashMap<MachineId, Result<Vec<Part>, String>>>,
    error_codes: Mutex<HashMap<PartId, Result<Vec<String>, String>>>,
    error_codes_delay: Mutex<HashMap<PartId, Duration>>,
    counters: Mutex<VecDeque<Result<Vec<CounterStatus>, String>>>,
    counters_delay: Mutex<Option<Duration>>,
    recent: Mutex<VecDeque<Result<Vec<ErrorRecord>, String>>>,
    error_detail: Mutex<HashMap<PartId, Result<Vec<ErrorRecord>, String>>>,
    error_detail_delay: Mutex<HashMap<PartId, Duration>>,
    counters_calls: AtomicUsize,
    counters_in_flight: AtomicUsize,
    counters_max_in_flight: AtomicUsize,
}

impl MockSources {
    pub fn new() -> Self {
        Self {
            catalog: Mutex::new(HashMap::new()),
            error_codes: Mutex::new(HashMap::new()),
            error_codes_delay: Mutex::new(HashMap::new()),
            counters: Mutex::new(VecDeque::new()),
            counters_delay: Mutex::new(None),
            recent: Mutex::new(VecDeque::new()),
            error_detail: Mutex::new(HashMap::new()),
            error_detail_delay: Mutex::new(HashMap::new()),
            counters_calls: AtomicUsize::new(0),
            counters_in_flight: AtomicUsize::new(0),
            counters_max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn set_catalog(&self, machine: MachineId, result: Result<Vec<Part>, String>) {
        self.catalog.lock().insert(machine, result);
    }

    pub fn set_error_codes(&self, part: PartId, result: Result<Vec<String>, String>) {
        self.error_codes.lock().insert(part, result);
    }

    pub fn set_error_codes_delay(&self, part: PartId, delay: Duration) {
        self.error_codes_delay.lock().insert(part, delay);
    }

    /// Queue one counters response; queued entries are served one per call
    /// and the final entry repeats.
    pub fn push_counters(&self, result: Result<Vec<CounterStatus>, String>) {
        self.counters.lock().push_back(result);
    }

    pub fn set_counters(&self, result: Result<Vec<CounterStatus>, String>) {
        let mut queue = self.counters.lock();
        queue.clear();
        queue.push_back(result);
    }

    pub fn set_counters_delay(&self, delay: Duration) {
        *self.counters_delay.lock() = Some(delay);
    }

    pub fn push_recent_errors(&self, result: Result<Vec<ErrorRecord>, String>) {
        self.recent.lock().push_back(result);
    }

    pub fn set_recent_errors(&self, result: Result<Vec<ErrorRecord>, String>) {
        let mut queue = self.recent.lock();
        queue.clear();
        queue.push_back(result);
    }

    pub fn set_error_detail(&self, part: PartId, result: Result<Vec<ErrorRecord>, String>) {
        self.error_detail.lock().insert(part, result);
    }

    pub fn set_error_detail_delay(&self, part: PartId, delay: Duration) {
        self.error_detail_delay.lock().insert(part, delay);
    }

    pub fn counters_calls(&self) -> usize {
        self.counters_calls.load(Ordering::SeqCst)
    }

    /// The highest number of concurrently outstanding counters requests
    /// observed, i.e. the number of overlapping ticks.
    pub fn counters_max_in_flight(&self) -> usize {
        self.counters_max_in_flight.load(Ordering::SeqCst)
    }

    fn pop_queued<T: Clone>(queue: &Mutex<VecDeque<Result<T, String>>>) -> Result<T, String> {
        let mut queue = queue.lock();
        if queue.len() > 1 {
            queue.pop_front().expect("queue checked non-empty")
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err("no scripted response".to_string()))
        }
    }
}

impl Default for MockSources {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PartSources for MockSources {
    async fn catalog(&self, machine: MachineId) -> Result<Vec<Part>, ClientError> {
        self.catalog
            .lock()
            .get(&machine)
            .cloned()
            .unwrap_or_else(|| Err("catalog not configured".to_string()))
            .map_err(http_error)
    }

    async fn error_codes(
        &self,
        part: PartId,
        _date_from: DateTime<Utc>,
    ) -> Result<Vec<String>, ClientError> {
        let delay = self.error_codes_delay.lock().get(&part).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.error_codes
            .lock()
            .get(&part)
            .cloned()
            .unwrap_or_else(|| Err("no scripted response".to_string()))
            .map_err(http_error)
    }

    async fn counters(&self, _machine: MachineId) -> Result<Vec<CounterStatus>, ClientError> {
        self.counters_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.counters_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters_max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        let delay = *self.counters_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.counters.lock().is_empty() {
            Ok(vec![])
        } else {
            Self::pop_queued(&self.counters).map_err(http_error)
        };
        self.counters_in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn recent_errors(&self, _machine: MachineId) -> Result<Vec<ErrorRecord>, ClientError> {
        if self.recent.lock().is_empty() {
            return Ok(vec![]);
        }
        Self::pop_queued(&self.recent).map_err(http_error)
    }

    async fn error_detail(
        &self,
        part: PartId,
        _date_from: DateTime<Utc>,
    ) -> Result<Vec<ErrorRecord>, ClientError> {
        let delay = self.error_detail_delay.lock().get(&part).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.error_detail
            .lock()
            .get(&part)
            .cloned()
            .unwrap_or_else(|| Err("no scripted response".to_string()))
            .map_err(http_error)
    }
}

pub fn http_error(message: impl Into<String>) -> ClientError {
    ClientError::Http(message.into())
}

pub fn part(id: PartId, name: &str) -> Part {
    Part {
        id,
        name: name.to_string(),
        x: 0.0,
        y: 0.0,
    }
}

pub fn counter_status(part_id: PartId, counter: i64) -> CounterStatus {
    CounterStatus {
        part_id,
        name: format!("Part {part_id}"),
        counter,
        is_empty: false,
    }
}

pub fn error_record(id: i64, code: &str) -> ErrorRecord {
    ErrorRecord {
        id,
        part_id: None,
        error_id: None,
        error_code: code.to_string(),
        description: String::new(),
        occurred_at: Utc.with_ymd_and_hms(2024, 1, 1, 11, 59, 30).unwrap(),
    }
}
