//! HTTP plumbing
//!
//! Shared client construction and the transport seam the catalog pipeline
//! fetches through.

use std::future::Future;
use std::time::Duration;

use crate::config::NetworkConfig;

/// Transport-level fetch failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Connection, TLS, or timeout failure.
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Byte-level fetch seam.
///
/// Implemented by [`HttpTransport`] in production and by in-memory fakes
/// under test, so the catalog pipeline never talks to `reqwest` directly.
pub trait Transport: Send + Sync {
    /// Fetch the full response body for `url`.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(url).await
    }
}

/// reqwest-backed transport.
///
/// Follows redirects (client default). TLS peer verification stays enabled
/// for every fetch, images included.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(network: &NetworkConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(network.user_agent.clone())
            .timeout(Duration::from_secs(network.timeout_seconds))
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
