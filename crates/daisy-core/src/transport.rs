//! Transport Capability
//!
//! The narrow interface every resource client is built on: one authenticated
//! request in, one parsed JSON body out. Credentials, base URL, timeouts and
//! query encoding belong to the implementation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use daisy_core::transport::{ApiRequest, Transport};
//!
//! let body = transport.send(ApiRequest::get("/")).await?;
//! ```

use std::collections::VecDeque;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{DaisyError, Result};

/// HTTP method used by the SDK
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the resource base URL
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,

    /// Path relative to the base, starting with `/`
    pub path: String,

    /// Query parameters, encoded by the transport
    pub query: Vec<(String, String)>,

    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// POST with a serialized body
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// Authenticated request primitive (Strategy pattern)
///
/// Implemented by `daisy_runtime::HttpTransport` for the real service and by
/// [`MockTransport`] for tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the parsed response body
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// In-memory transport: records requests and replays queued responses
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body
    pub async fn push_response(&self, body: Value) {
        self.responses.lock().await.push_back(Ok(body));
    }

    /// Queue a failure
    pub async fn push_error(&self, error: DaisyError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Requests sent so far, in order
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        tracing::debug!(method = %request.method, path = %request.path, "Mock transport request");
        self.requests.lock().await.push(request);

        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(DaisyError::Transport("No mock response queued".into())))
    }
}
