//! # partwatch-types
//!
//! Core types for machine part monitoring. This crate defines the schema
//! shared by the polling engine, the backend client, and any rendering
//! front end: the part catalog, per-part counter and error state, and the
//! merged [`Snapshot`] that monitoring views consume.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies** beyond timestamps: serialization is
//!   opt-in via the `serde` feature
//! - **Degradation as data**: a failed lookup is an [`ErrorMarker`]
//!   variant, not an exception or a silently coerced value
//! - **One immutable view**: a [`Snapshot`] is built once per polling tick
//!   and never mutated afterwards
//!
//! ## Features
//!
//! - `serde`: JSON serialization of all types via serde
//!
//! ## Example
//!
//! ```rust
//! use partwatch_types::{CounterStatus, FillLevel, TimeRange};
//!
//! let counter = CounterStatus {
//!     part_id: 10,
//!     name: "Feeder 3".to_string(),
//!     counter: -1,
//!     is_empty: false,
//! };
//! assert_eq!(counter.fill_level(), FillLevel::Low);
//!
//! let range: TimeRange = "1h".parse().unwrap();
//! assert_eq!(range.label(), "1h");
//! ```

mod counter;
mod errors;
mod part;
mod range;
mod snapshot;

pub use counter::*;
pub use errors::*;
pub use part::*;
pub use range::*;
pub use snapshot::*;
