use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use feedview_protocol::{DataSnapshot, FetchError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::NetworkError;

/// Anything that can produce a fresh snapshot on demand.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<DataSnapshot, FetchError>;
}

/// reqwest-backed source for the dashboard endpoint.
#[derive(Clone)]
pub struct SnapshotClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for SnapshotClient {
    // The bearer token stays out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl SnapshotClient {
    /// Build a client. `timeout` of `None` waits indefinitely.
    pub fn new(
        endpoint: &str,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, NetworkError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| NetworkError::InvalidEndpoint(endpoint.to_string(), e.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| NetworkError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            token: token.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn get(&self) -> Result<DataSnapshot, FetchError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response.bytes().await.map_err(network_error)?;
        DataSnapshot::from_json(&body)
    }
}

#[async_trait]
impl SnapshotSource for SnapshotClient {
    async fn fetch_snapshot(&self) -> Result<DataSnapshot, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "fetching snapshot");
        match self.get().await {
            Ok(snapshot) => {
                tracing::info!(
                    feedback = snapshot.feedback_count(),
                    waitlist = snapshot.waitlist_count(),
                    "snapshot fetched"
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "snapshot fetch failed");
                Err(e)
            }
        }
    }
}

fn network_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Network(format!("request timed out: {e}"))
    } else {
        FetchError::Network(e.to_string())
    }
}
