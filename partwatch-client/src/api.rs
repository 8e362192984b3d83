//! HTTP client for the machine monitoring backend.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;

use partwatch_types::{
    wire_timestamp, CompanyId, CounterStatus, ErrorRecord, Machine, MachineId, Part, PartId,
};

use crate::decode::decode_error_codes;
use crate::ClientError;

/// Which of the two historical error-list endpoints to query.
///
/// Older backend deployments expose `/api/get_error_ids`, newer ones
/// `/api/get_error_str`; both take the same parameters and both are decoded
/// tolerantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCodesEndpoint {
    Identifiers,
    #[default]
    Strings,
}

impl ErrorCodesEndpoint {
    fn path(&self) -> &'static str {
        match self {
            ErrorCodesEndpoint::Identifiers => "api/get_error_ids",
            ErrorCodesEndpoint::Strings => "api/get_error_str",
        }
    }
}

/// Client for the monitoring backend's HTTP API.
///
/// One request method per endpoint; every method maps transport and shape
/// failures into [`ClientError`] and never panics on malformed bodies.
///
/// ## Example
///
/// ```rust,no_run
/// use partwatch_client::ApiClient;
///
/// # async fn run() -> Result<(), partwatch_client::ClientError> {
/// let client = ApiClient::builder()
///     .endpoint("http://factory-gw.local:5000")
///     .build();
///
/// let parts = client.machine_parts(1).await?;
/// println!("{} parts on the board", parts.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
    error_codes_endpoint: ErrorCodesEndpoint,
}

impl ApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Fetch the machine directory for a company.
    pub async fn machines(&self, company_id: CompanyId) -> Result<Vec<Machine>, ClientError> {
        let url = format!(
            "{}/api/get_machines_by_company_id/{}",
            self.endpoint, company_id
        );
        self.get_json(&url, &[]).await
    }

    /// Fetch the part catalog for a machine.
    pub async fn machine_parts(&self, machine_id: MachineId) -> Result<Vec<Part>, ClientError> {
        let url = format!(
            "{}/api/get_machine_parts_by_machine_id/{}",
            self.endpoint, machine_id
        );
        self.get_json(&url, &[]).await
    }

    /// Fetch the error codes recorded for one part since `date_from`.
    ///
    /// The response shape varies across backend revisions, so the payload
    /// goes through the tolerant decode step; an unusable payload surfaces
    /// as [`ClientError::Parse`].
    pub async fn part_error_codes(
        &self,
        part_id: PartId,
        date_from: DateTime<Utc>,
    ) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/{}", self.endpoint, self.error_codes_endpoint.path());
        let payload: Value = self
            .get_json(
                &url,
                &[
                    ("part_id", part_id.to_string()),
                    ("date_from", wire_timestamp(date_from)),
                ],
            )
            .await?;
        decode_error_codes(&payload).map_err(ClientError::Parse)
    }

    /// Fetch the inventory counters for all parts of a machine.
    pub async fn counters(&self, machine_id: MachineId) -> Result<Vec<CounterStatus>, ClientError> {
        let url = format!("{}/api/get_prts_counters", self.endpoint);
        self.get_json(&url, &[("machine_id", machine_id.to_string())])
            .await
    }

    /// Fetch the machine-wide recent error feed.
    pub async fn last_errors(&self, machine_id: MachineId) -> Result<Vec<ErrorRecord>, ClientError> {
        let url = format!("{}/api/get_last_errors/{}", self.endpoint, machine_id);
        self.get_json(&url, &[]).await
    }

    /// Fetch full error detail for one part since `date_from`.
    pub async fn error_detail(
        &self,
        part_id: PartId,
        date_from: DateTime<Utc>,
    ) -> Result<Vec<ErrorRecord>, ClientError> {
        let url = format!("{}/api/get_error_for_parts", self.endpoint);
        self.get_json(
            &url,
            &[
                ("part_id", part_id.to_string()),
                ("date_from", wire_timestamp(date_from)),
            ],
        )
        .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    error_codes_endpoint: ErrorCodesEndpoint,
}

impl ApiClientBuilder {
    /// Set the backend base address (e.g., "http://localhost:5000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout (default: 2 seconds).
    ///
    /// Keep this below the polling interval so one slow source cannot pile
    /// requests up behind itself.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Select which error-list endpoint the backend exposes.
    pub fn error_codes_endpoint(mut self, endpoint: ErrorCodesEndpoint) -> Self {
        self.error_codes_endpoint = endpoint;
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(2));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        ApiClient {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:5000".to_string())
                .trim_end_matches('/')
                .to_string(),
            error_codes_endpoint: self.error_codes_endpoint,
        }
    }
}
