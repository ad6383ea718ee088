//! Throttled JSON GET client bound to a fixed base URL.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::throttle::Throttle;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(5000);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Request to `{url}` failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to decode response from `{url}`: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[async_trait]
pub trait HttpGet: Send + Sync {
    /// GET `path` relative to the client's base URL and decode the JSON body.
    async fn get(&self, path: &str) -> Result<JsonValue, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|source| ApiError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` under the base URL, keeping any path prefix the base
    /// URL already has.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/{}", path.trim_start_matches('/'));
        Url::parse(&full).map_err(|source| ApiError::InvalidUrl { url: full, source })
    }
}

#[async_trait]
impl HttpGet for ReqwestClient {
    async fn get(&self, path: &str) -> Result<JsonValue, ApiError> {
        let url = self.resolve(path)?;
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| ApiError::Request {
                url: url.to_string(),
                source,
            })?;
        response.json().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// An [`HttpGet`] client whose calls go through a [`Throttle`].
#[derive(Debug)]
pub struct ThrottledApi<C = ReqwestClient> {
    client: C,
    throttle: Throttle,
}

impl ThrottledApi {
    pub fn new(base_url: &str, throttle_interval: Duration) -> Result<Self, ApiError> {
        Ok(Self::with_client(
            ReqwestClient::new(base_url)?,
            throttle_interval,
        ))
    }
}

impl<C: HttpGet> ThrottledApi<C> {
    pub fn with_client(client: C, throttle_interval: Duration) -> Self {
        Self {
            client,
            throttle: Throttle::new(throttle_interval),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn throttled_get_data_from_api(&self, path: &str) -> Result<JsonValue, ApiError> {
        self.throttle.run(|| self.client.get(path)).await
    }
}
