//! Sources an updated network catalog can be pulled from

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use super::{builtin_networks, Network};

/// Supplies a replacement network set on request
#[async_trait]
pub trait NetworkSource: Send + Sync {
    /// Fetch the current ordered network set
    async fn fetch(&self) -> Result<Vec<Network>>;
}

/// A fixed catalog held in memory
#[derive(Debug, Clone)]
pub struct StaticNetworkSource {
    networks: Vec<Network>,
}

impl StaticNetworkSource {
    /// Create a source that always returns `networks`
    pub fn new(networks: Vec<Network>) -> Self {
        Self { networks }
    }

    /// Parse a JSON array of networks (camelCase fields)
    pub fn from_json(json: &str) -> Result<Self> {
        let networks: Vec<Network> = serde_json::from_str(json)
            .map_err(|e| Error::NetworkSource(format!("Invalid network catalog: {}", e)))?;
        Ok(Self::new(networks))
    }
}

impl Default for StaticNetworkSource {
    fn default() -> Self {
        Self::new(builtin_networks())
    }
}

#[async_trait]
impl NetworkSource for StaticNetworkSource {
    async fn fetch(&self) -> Result<Vec<Network>> {
        Ok(self.networks.clone())
    }
}

/// Pulls a JSON network catalog over HTTP
#[derive(Debug, Clone)]
pub struct HttpNetworkSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpNetworkSource {
    /// Create a source for the catalog at `url`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl NetworkSource for HttpNetworkSource {
    async fn fetch(&self) -> Result<Vec<Network>> {
        debug!(url = %self.url, "fetching network catalog");

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::NetworkSource(format!("Failed to fetch network catalog: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::NetworkSource(format!("Network catalog request failed: {}", e)))?;

        response
            .json::<Vec<Network>>()
            .await
            .map_err(|e| Error::NetworkSource(format!("Invalid network catalog: {}", e)))
    }
}
