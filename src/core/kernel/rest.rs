use crate::core::config::ConfigError;
use crate::core::errors::ExchangeError;
use crate::core::kernel::clock::{Clock, SystemClock};
use crate::core::kernel::query::QueryParams;
use crate::core::kernel::signer::{Signer, SigningContext};
use crate::core::kernel::transport::{ReqwestTransport, RestRequest, Transport};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds, applied by the default transport
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    /// * `exchange_name` - Name of the exchange
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            exchange_name,
            timeout_seconds: 30,
            user_agent: concat!("prorest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
            transport: None,
            clock: None,
        }
    }

    /// Set the signer used for every request
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Replace the default reqwest transport
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the system clock used for signing timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the REST client
    ///
    /// A signer is mandatory: every call this client makes is signed.
    pub fn build(self) -> Result<RestClient, ExchangeError> {
        let signer = self.signer.ok_or_else(|| {
            ExchangeError::AuthError("Signed requests need a signer".to_string())
        })?;

        let base_url = Url::parse(&self.config.base_url).map_err(|e| {
            ConfigError::InvalidConfiguration(format!(
                "Invalid base URL {}: {}",
                self.config.base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidConfiguration(format!(
                "Base URL {} cannot carry a path",
                self.config.base_url
            ))
            .into());
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config.timeout_seconds)?),
        };

        Ok(RestClient {
            config: self.config,
            base_url,
            signer,
            transport,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

/// Shape of every non-200 body the API sends
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Signing REST client
///
/// Immutable once built. Each call builds its own signing context, so one
/// instance can be shared across tasks.
#[derive(Clone)]
pub struct RestClient {
    config: RestClientConfig,
    base_url: Url,
    signer: Arc<dyn Signer>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Build and sign a request without sending it
    ///
    /// `path` is appended to the base URL's own path and percent-encoded, and
    /// the query is attached. The path and query of that final URL are what
    /// gets signed, so the signature always covers the bytes on the wire.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
        params: Option<&QueryParams>,
    ) -> Result<RestRequest, ExchangeError> {
        let url = self.endpoint_url(path, params)?;
        let request_path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let timestamp = self.clock.unix_seconds().to_string();

        let context = SigningContext::new(timestamp, method.as_str(), &request_path, &body);
        let auth_headers = self.signer.sign_request(&context)?;

        let mut headers = HeaderMap::with_capacity(auth_headers.len() + 3);
        for (name, value) in auth_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ExchangeError::AuthError(format!("Invalid header name {}: {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|_| {
                ExchangeError::AuthError(format!("Invalid characters in {} header", name))
            })?;
            headers.insert(header_name, header_value);
        }

        let user_agent = HeaderValue::from_str(&self.config.user_agent).map_err(|_| {
            ExchangeError::InvalidParameters("Invalid characters in user agent".to_string())
        })?;
        headers.insert(USER_AGENT, user_agent);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(RestRequest {
            method,
            url: url.to_string(),
            request_path,
            headers,
            body,
        })
    }

    fn endpoint_url(&self, path: &str, params: Option<&QueryParams>) -> Result<Url, ExchangeError> {
        let mut url = self.base_url.clone();
        let full_path = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&full_path);

        let query = match params {
            Some(params) => params.encode()?,
            None => String::new(),
        };
        url.set_query(if query.is_empty() { None } else { Some(&query) });
        url.set_fragment(None);
        Ok(url)
    }

    /// Send a built request and return the body of a 200 response
    ///
    /// Any other status becomes an [`ExchangeError::ApiError`]. Transport
    /// failures come back untouched.
    pub async fn execute(&self, request: RestRequest) -> Result<Vec<u8>, ExchangeError> {
        debug!(method = %request.method, path = %request.request_path, "sending signed request");

        let response = self.transport.send(request).await?;
        trace!("Response body: {}", String::from_utf8_lossy(&response.body));

        if response.status == StatusCode::OK {
            Ok(response.body)
        } else {
            Err(decode_error(response.status, &response.body))
        }
    }

    /// Build, sign and execute a call, returning the raw success body
    #[instrument(skip(self, body, params), fields(exchange = %self.config.exchange_name, method = %method, path = %path))]
    pub async fn request_raw(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
        params: Option<&QueryParams>,
    ) -> Result<Vec<u8>, ExchangeError> {
        let request = self.build_request(method, path, body, params)?;
        self.execute(request).await
    }

    /// Build, sign and execute a call, decoding the body into `T`
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
        params: Option<&QueryParams>,
    ) -> Result<T, ExchangeError> {
        let body = self.request_raw(method, path, body, params).await?;
        decode_body(&body)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<T, ExchangeError> {
        self.request_json(Method::GET, path, Vec::new(), params).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request_json(Method::POST, path, body, None).await
    }

    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<T, ExchangeError> {
        self.request_json(Method::DELETE, path, Vec::new(), params).await
    }
}

/// Turn a non-200 response into an API error
///
/// Falls back to the raw body text when it is not `{"message": ...}`, so the
/// status code always survives.
pub fn decode_error(status: StatusCode, body: &[u8]) -> ExchangeError {
    let message = serde_json::from_slice::<ApiErrorBody>(body).map_or_else(
        |_| String::from_utf8_lossy(body).trim().to_string(),
        |parsed| parsed.message,
    );

    ExchangeError::ApiError {
        status: status.as_u16(),
        message,
    }
}

/// Decode a success body into the caller's shape
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ExchangeError> {
    serde_json::from_slice(body).map_err(|e| {
        ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
    })
}

/// Serialize a request body to the bytes that are both signed and sent
pub fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ExchangeError> {
    serde_json::to_vec(body).map_err(|e| {
        ExchangeError::SerializationError(format!("Failed to serialize request body: {}", e))
    })
}
