#![allow(dead_code)]

use async_trait::async_trait;
use prorest::core::kernel::{FixedClock, RestRequest, RestResponse, Transport};
use prorest::{ExchangeError, ProBuilder, ProRest};
use reqwest::{StatusCode, Url};
use std::sync::{Arc, Mutex};

/// Decodes to "123abcSuperSecretSecret"
pub const SECRET: &str = "MTIzYWJjU3VwZXJTZWNyZXRTZWNyZXQ=";
pub const TIMESTAMP: i64 = 1_600_000_000;

/// Transport double that records every request and answers from a route table
///
/// Routes match on the request path (query included) by prefix, first match
/// wins. Unmatched requests get a 404 with an API error body.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<Vec<(String, StatusCode, String)>>,
    requests: Mutex<Vec<RestRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, path_prefix: &str, status: StatusCode, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .push((path_prefix.to_string(), status, body.to_string()));
    }

    pub fn ok(&self, path_prefix: &str, body: &str) {
        self.route(path_prefix, StatusCode::OK, body);
    }

    pub fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RestRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: RestRequest) -> Result<RestResponse, ExchangeError> {
        let response = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _, _)| request.request_path.starts_with(prefix.as_str()))
            .map(|(_, status, body)| RestResponse::new(*status, body.clone()))
            .unwrap_or_else(|| {
                RestResponse::new(StatusCode::NOT_FOUND, r#"{"message":"NotFound"}"#)
            });

        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}

/// Client wired to `transport` with a pinned signing clock
pub fn client(transport: Arc<RecordingTransport>) -> ProRest {
    client_at("https://api.test", transport)
}

pub fn client_at(base_url: &str, transport: Arc<RecordingTransport>) -> ProRest {
    ProBuilder::new()
        .with_credentials("key".to_string(), SECRET.to_string(), "pass".to_string())
        .with_base_url(base_url.to_string())
        .with_transport(transport)
        .with_clock(Arc::new(FixedClock(TIMESTAMP)))
        .build()
        .expect("test client builds")
}

/// Path and query of the URL the request is sent to
pub fn wire_path(request: &RestRequest) -> String {
    let url = Url::parse(&request.url).expect("request url parses");
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
