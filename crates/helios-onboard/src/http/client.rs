/*
[INPUT]:  HTTP configuration (base URL, timeouts) and the persisted token slot
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::SessionRepository;
use crate::http::{OnboardError, Result};

/// Base URL for the Helios onboarding API
pub const DEFAULT_BASE_URL: &str = "https://testnet-api.helioschain.network";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the onboarding API.
///
/// Presents the persisted bearer token on every request when one exists.
#[derive(Clone)]
pub struct HeliosClient {
    http_client: Client,
    base_url: Url,
    repository: Arc<dyn SessionRepository>,
}

impl HeliosClient {
    /// Create a new client with default configuration
    pub fn new(repository: Arc<dyn SessionRepository>) -> Result<Self> {
        Self::with_config_and_base_url(ClientConfig::default(), DEFAULT_BASE_URL, repository)
    }

    pub fn with_config_and_base_url(
        config: ClientConfig,
        base_url: &str,
        repository: Arc<dyn SessionRepository>,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| OnboardError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            repository,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build request builder for an endpoint, attaching the bearer token
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        let builder = self.http_client.request(method, url);
        Ok(match self.repository.read() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request and decode a JSON body, classifying any failure
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = OnboardError::classify(status, &body);
            debug!(status = status.as_u16(), error = %err, "api request failed");
            return Err(err);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl std::fmt::Debug for HeliosClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeliosClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
