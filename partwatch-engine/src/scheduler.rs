//! The polling scheduler: machine selection, epochs, and the tick loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use partwatch_types::MachineId;

use crate::config::EngineConfig;
use crate::drilldown::Drilldown;
use crate::fetch::collect_batch;
use crate::merge::merge;
use crate::sources::PartSources;
use crate::store::SnapshotStore;

/// Lifecycle of the engine for the currently selected machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EngineState {
    /// No machine selected yet.
    #[default]
    Idle,
    /// The part catalog is being fetched.
    CatalogLoading,
    /// The catalog fetch failed; polling is halted until the machine
    /// changes or [`Engine::retry`] is called.
    CatalogError(String),
    /// The catalog is loaded and the machine is being polled.
    Ready,
}

/// The polling engine for one selected machine at a time.
///
/// Selecting a machine loads its part catalog and then polls all sources
/// on a fixed cadence, publishing each merged [`Snapshot`] to the
/// [`SnapshotStore`]. Ticks are single-flight: a tick that outlasts the
/// interval delays the next one rather than overlapping it, and missed
/// ticks are skipped.
///
/// Every machine selection advances an epoch. The poll task checks the
/// epoch after its fan-in completes, so results belonging to a previously
/// selected machine are discarded instead of published.
///
/// [`Snapshot`]: partwatch_types::Snapshot
///
/// ## Example
///
/// ```rust,no_run
/// use partwatch_client::ApiClient;
/// use partwatch_engine::{Engine, EngineConfig};
///
/// # async fn run() {
/// let client = ApiClient::builder().endpoint("http://localhost:5000").build();
/// let engine = Engine::new(client, EngineConfig::default());
///
/// engine.select_machine(1);
///
/// let mut snapshots = engine.store().subscribe();
/// while snapshots.changed().await.is_ok() {
///     if let Some(snapshot) = snapshots.borrow().clone() {
///         println!("{} parts, degraded: {}", snapshot.parts.len(), snapshot.any_degraded());
///     }
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct Engine<S> {
    sources: Arc<S>,
    config: EngineConfig,
    store: SnapshotStore,
    drilldown: Drilldown<S>,
    state_tx: Arc<watch::Sender<EngineState>>,
    epoch: Arc<AtomicU64>,
    current: Mutex<Option<PollTask>>,
}

#[derive(Debug)]
struct PollTask {
    machine: MachineId,
    handle: JoinHandle<()>,
}

impl<S: PartSources> Engine<S> {
    /// Create an engine polling the given sources. Requires a tokio
    /// runtime for machine selection and drill-down requests.
    pub fn new(sources: S, config: EngineConfig) -> Self {
        let sources = Arc::new(sources);
        Self {
            drilldown: Drilldown::new(sources.clone()),
            sources,
            config,
            store: SnapshotStore::new(),
            state_tx: Arc::new(watch::Sender::new(EngineState::Idle)),
            epoch: Arc::new(AtomicU64::new(0)),
            current: Mutex::new(None),
        }
    }

    /// The snapshot store readers consume.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// The drill-down fetcher for on-demand part detail.
    pub fn drilldown(&self) -> &Drilldown<S> {
        &self.drilldown
    }

    /// The current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to lifecycle state changes.
    pub fn state_changes(&self) -> watch::Receiver<EngineState> {
        self.state_tx.subscribe()
    }

    /// The machine currently selected, if any.
    pub fn current_machine(&self) -> Option<MachineId> {
        self.current.lock().as_ref().map(|task| task.machine)
    }

    /// Select a machine and start polling it.
    ///
    /// Invalidates the previous machine's epoch: its in-flight work is
    /// cancelled and any late results are discarded. The store is cleared
    /// so readers never see the old machine's data under the new one.
    pub fn select_machine(&self, machine: MachineId) {
        info!(machine, "machine selected");
        self.start_polling(machine);
    }

    /// Retry after a catalog failure by re-selecting the current machine.
    pub fn retry(&self) {
        let machine = self.current.lock().as_ref().map(|task| task.machine);
        if let Some(machine) = machine {
            info!(machine, "catalog retry requested");
            self.start_polling(machine);
        }
    }

    /// Stop polling and return to idle.
    pub fn stop(&self) {
        if let Some(task) = self.current.lock().take() {
            task.handle.abort();
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.store.clear();
        self.drilldown.clear();
        self.state_tx.send_replace(EngineState::Idle);
    }

    fn start_polling(&self, machine: MachineId) {
        let mut current = self.current.lock();
        if let Some(task) = current.take() {
            task.handle.abort();
        }

        let my_epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.clear();
        self.drilldown.clear();
        self.state_tx.send_replace(EngineState::CatalogLoading);

        let sources = self.sources.clone();
        let config = self.config.clone();
        let store = self.store.clone();
        let state_tx = self.state_tx.clone();
        let epoch = self.epoch.clone();

        let handle = tokio::spawn(async move {
            poll_loop(sources, config, store, state_tx, epoch, my_epoch, machine).await;
        });

        *current = Some(PollTask { machine, handle });
    }
}

impl<S> Drop for Engine<S> {
    fn drop(&mut self) {
        if let Some(task) = self.current.lock().take() {
            task.handle.abort();
        }
    }
}

async fn poll_loop<S: PartSources>(
    sources: Arc<S>,
    config: EngineConfig,
    store: SnapshotStore,
    state_tx: Arc<watch::Sender<EngineState>>,
    epoch: Arc<AtomicU64>,
    my_epoch: u64,
    machine: MachineId,
) {
    let is_current = || epoch.load(Ordering::SeqCst) == my_epoch;

    let parts = match sources.catalog(machine).await {
        Ok(parts) => parts,
        Err(err) => {
            if is_current() {
                error!(machine, "catalog fetch failed: {}", err);
                state_tx.send_replace(EngineState::CatalogError(err.reason()));
            }
            return;
        }
    };

    if !is_current() {
        debug!(machine, "discarding catalog from superseded epoch");
        return;
    }

    info!(machine, parts = parts.len(), "catalog loaded, polling started");
    state_tx.send_replace(EngineState::Ready);

    let mut interval = tokio::time::interval(config.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if !is_current() {
            return;
        }

        // Resolved freshly per tick; the window slides with the clock.
        let date_from = config.time_range.resolve_now();
        let batch = collect_batch(sources.as_ref(), machine, &parts, date_from).await;

        if !is_current() {
            debug!(machine, "discarding tick results from superseded epoch");
            return;
        }

        let previous = store.latest();
        let snapshot = merge(parts.clone(), batch, previous.as_deref(), Utc::now());
        if snapshot.any_degraded() {
            debug!(machine, "snapshot published with degraded sources");
        }
        store.publish(snapshot);
    }
}
