//! The snapshot store: one writer, many readers.

use std::sync::Arc;

use tokio::sync::watch;

use partwatch_types::Snapshot;

/// Holds the latest published snapshot for a machine.
///
/// Exactly one writer (the scheduler's tick handler) replaces the snapshot
/// atomically; any number of readers either grab the current value with
/// [`SnapshotStore::latest`] or subscribe to publications with
/// [`SnapshotStore::subscribe`]. Readers always see a complete snapshot
/// from a single tick, never a partially-written one.
///
/// # Example
///
/// ```
/// use partwatch_engine::SnapshotStore;
///
/// # tokio_test::block_on(async {
/// let store = SnapshotStore::new();
/// let mut updates = store.subscribe();
/// assert!(store.latest().is_none());
/// assert!(updates.borrow().is_none());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    tx: Arc<watch::Sender<Option<Arc<Snapshot>>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// The last published snapshot, if any tick has completed yet.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot publications.
    ///
    /// The receiver yields `None` until the first tick completes and an
    /// `Arc` of each published snapshot afterwards.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.tx.subscribe()
    }

    /// Replace the stored snapshot. Scheduler-only.
    pub(crate) fn publish(&self, snapshot: Snapshot) {
        self.tx.send_replace(Some(Arc::new(snapshot)));
    }

    /// Drop the stored snapshot, e.g. when the selected machine changes.
    pub(crate) fn clear(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
