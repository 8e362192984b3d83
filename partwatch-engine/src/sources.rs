//! Source abstraction over the backend endpoints.
//!
//! The scheduler is parameterized by a [`PartSources`] implementation
//! instead of calling the HTTP client directly. Production uses
//! [`partwatch_client::ApiClient`]; tests substitute a mock with scripted
//! failures and delays.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use partwatch_client::{ApiClient, ClientError};
use partwatch_types::{CounterStatus, ErrorRecord, MachineId, Part, PartId};

/// The backend data sources one machine is polled from.
///
/// Every method maps onto one backend endpoint and fails with a
/// [`ClientError`]; fault policy (fatal catalog, soft everything else)
/// lives in the engine, not in implementations.
#[async_trait]
pub trait PartSources: Send + Sync + 'static {
    /// The part catalog for a machine.
    async fn catalog(&self, machine: MachineId) -> Result<Vec<Part>, ClientError>;

    /// Error codes for one part since `date_from`.
    async fn error_codes(
        &self,
        part: PartId,
        date_from: DateTime<Utc>,
    ) -> Result<Vec<String>, ClientError>;

    /// Inventory counters for the whole machine.
    async fn counters(&self, machine: MachineId) -> Result<Vec<CounterStatus>, ClientError>;

    /// The machine-wide recent error feed.
    async fn recent_errors(&self, machine: MachineId) -> Result<Vec<ErrorRecord>, ClientError>;

    /// Full error detail for one part since `date_from`.
    async fn error_detail(
        &self,
        part: PartId,
        date_from: DateTime<Utc>,
    ) -> Result<Vec<ErrorRecord>, ClientError>;
}

#[async_trait]
impl PartSources for ApiClient {
    async fn catalog(&self, machine: MachineId) -> Result<Vec<Part>, ClientError> {
        self.machine_parts(machine).await
    }

    async fn error_codes(
        &self,
        part: PartId,
        date_from: DateTime<Utc>,
    ) -> Result<Vec<String>, ClientError> {
        self.part_error_codes(part, date_from).await
    }

    async fn counters(&self, machine: MachineId) -> Result<Vec<CounterStatus>, ClientError> {
        ApiClient::counters(self, machine).await
    }

    async fn recent_errors(&self, machine: MachineId) -> Result<Vec<ErrorRecord>, ClientError> {
        self.last_errors(machine).await
    }

    async fn error_detail(
        &self,
        part: PartId,
        date_from: DateTime<Utc>,
    ) -> Result<Vec<ErrorRecord>, ClientError> {
        ApiClient::error_detail(self, part, date_from).await
    }
}
