//! # partwatch-client
//!
//! HTTP client for the machine monitoring backend. This crate owns every
//! network call the polling engine makes: the part catalog, per-part error
//! lists, inventory counters, the recent error feed, and on-demand error
//! detail.
//!
//! The backend is an unreliable collaborator: endpoints return non-success
//! statuses and bodies that drift between revisions. The client therefore
//! never assumes a well-formed response - status and shape failures all
//! land in [`ClientError`], and the ragged error-list payloads go through
//! an explicit tolerant decode step ([`decode::decode_error_codes`]).
//!
//! Whether a failure halts anything is not decided here; the engine maps
//! [`ClientError`]s into degraded markers and flags per its own policy.

mod api;
pub mod decode;
mod error;

pub use api::{ApiClient, ApiClientBuilder, ErrorCodesEndpoint};
pub use error::ClientError;
