use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

/// A fully built, signed request
///
/// `request_path` is the path plus query string exactly as signed; `url` is
/// the base URL followed by that same string.
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub method: Method,
    pub url: String,
    pub request_path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RestRequest {
    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// A response whose body has already been read in full
#[derive(Debug, Clone)]
pub struct RestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RestResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Capability to perform one HTTP exchange
///
/// Timeouts, retries and connection pooling are the transport's business; the
/// REST kernel sends each request exactly once.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RestRequest) -> Result<RestResponse, ExchangeError>;
}

/// Transport backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout_seconds: u64) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.request_path))]
    async fn send(&self, request: RestRequest) -> Result<RestResponse, ExchangeError> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        // reading the body to the end hands the connection back to the pool
        let body = response.bytes().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        debug!(status = %status, bytes = body.len(), "response received");
        Ok(RestResponse::new(status, body.to_vec()))
    }
}
