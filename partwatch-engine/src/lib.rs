//! # partwatch-engine
//!
//! The polling-and-aggregation core behind the machine monitoring views.
//! For one selected machine it repeatedly queries several independent,
//! differently-shaped backend sources, merges their results by part
//! identity into one consistent [`Snapshot`], and tolerates partial
//! failure of any single source without stalling the others.
//!
//! ## Architecture
//!
//! - [`Engine`] owns the lifecycle: selecting a machine loads the part
//!   catalog, then a fixed-cadence tick fans out to all sources, fans
//!   their results in, and publishes a merged snapshot atomically
//! - [`PartSources`] abstracts the backend endpoints so the engine can be
//!   driven against the real HTTP client or a scripted test double
//! - [`merge`] is the pure aggregation step; failures arrive as data and
//!   leave as degraded markers and flags, never as exceptions
//! - [`SnapshotStore`] has exactly one writer (the tick handler) and any
//!   number of readers
//! - [`Drilldown`] fetches full error detail for one part on demand,
//!   outside the polling cadence, with last-request-wins semantics
//!
//! Fault policy follows the severity ladder: a catalog failure halts
//! polling for the machine ([`EngineState::CatalogError`]); a failed
//! machine-wide source keeps its previous values for one tick and is
//! flagged degraded; a failed per-part lookup degrades only that part's
//! marker.
//!
//! [`Snapshot`]: partwatch_types::Snapshot

mod config;
mod drilldown;
mod fetch;
mod merge;
mod scheduler;
mod sources;
mod store;

#[cfg(test)]
mod testing;

pub use config::EngineConfig;
pub use drilldown::{Drilldown, DrilldownState};
pub use fetch::{collect_batch, fetch_error_markers, SourceBatch};
pub use merge::merge;
pub use scheduler::{Engine, EngineState};
pub use sources::PartSources;
pub use store::SnapshotStore;
