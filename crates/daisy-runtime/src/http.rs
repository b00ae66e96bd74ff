//! HTTP Transport
//!
//! `Transport` implementation over reqwest. Basic-auth credentials are fixed
//! at construction and attached to every request.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::instrument;

use daisy_core::{
    error::{DaisyError, Result},
    transport::{ApiRequest, Method, Transport},
};

use crate::config::{Credentials, DaisyConfig};

/// Rejects paths that could escape the resource base.
fn sanitize_path(path: &str) -> Result<&str> {
    if path.contains("..") || path.contains("//") {
        return Err(DaisyError::Argument(
            "Invalid path: traversal sequences not allowed".into(),
        ));
    }
    if !path.starts_with('/') {
        return Err(DaisyError::Argument("Path must start with '/'".into()));
    }
    Ok(path)
}

/// Authenticated JSON transport for the Daisy service
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    /// Create a transport with default endpoint and timeouts
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, &DaisyConfig::default())
    }

    /// Create from configuration
    pub fn with_config(credentials: Credentials, config: &DaisyConfig) -> Result<Self> {
        let url = Url::parse(&config.base_url)
            .map_err(|e| DaisyError::Config(format!("Invalid base URL {}: {e}", config.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DaisyError::Config(format!(
                "Unsupported URL scheme: {}",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| DaisyError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<String> {
        Ok(format!("{}{}", self.base_url, sanitize_path(path)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.path)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, &url)
            .basic_auth(&self.credentials.identifier, Some(self.credentials.secret_key()));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DaisyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Daisy request failed");
            return Err(DaisyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Daisy request completed");

        response
            .json::<Value>()
            .await
            .map_err(|e| DaisyError::Transport(e.to_string()))
    }
}
