use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{Clock, HmacSigner, RestClientBuilder, RestClientConfig, Transport};
use crate::exchanges::pro::rest::ProRest;
use std::sync::Arc;

/// Builder for [`ProRest`] clients
///
/// Credentials are validated when `build` runs: an empty key, secret or
/// passphrase, or a secret that is not base64, fails here rather than on the
/// first request.
pub struct ProBuilder {
    config: ExchangeConfig,
    rest_timeout: u64,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl Default for ProBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::new(String::new(), String::new(), String::new()),
            rest_timeout: 30,
            user_agent: None,
            transport: None,
            clock: None,
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Target the sandbox environment
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Set API credentials, keeping sandbox and URL overrides
    pub fn with_credentials(
        mut self,
        api_key: String,
        secret_key: String,
        passphrase: String,
    ) -> Self {
        let mut config = ExchangeConfig::new(api_key, secret_key, passphrase)
            .sandbox(self.config.sandbox);
        config.base_url = self.config.base_url.take();
        config.ws_url = self.config.ws_url.take();
        self.config = config;
        self
    }

    /// Set base URL for the REST API
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set REST request timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Send requests through `transport` instead of reqwest
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Take signing timestamps from `clock`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<ProRest, ExchangeError> {
        let signer = HmacSigner::from_config(&self.config)?;

        let mut rest_config =
            RestClientConfig::new(self.config.rest_url().to_string(), "pro".to_string())
                .with_timeout(self.rest_timeout);
        if let Some(user_agent) = self.user_agent {
            rest_config = rest_config.with_user_agent(user_agent);
        }

        let mut rest_builder = RestClientBuilder::new(rest_config).with_signer(Arc::new(signer));
        if let Some(transport) = self.transport {
            rest_builder = rest_builder.with_transport(transport);
        }
        if let Some(clock) = self.clock {
            rest_builder = rest_builder.with_clock(clock);
        }

        let rest = rest_builder.build()?;
        Ok(ProRest::new(rest, self.config.streaming_url().to_string()))
    }
}

/// Build a client straight from a configuration
pub fn build_client(config: ExchangeConfig) -> Result<ProRest, ExchangeError> {
    ProBuilder::new().with_config(config).build()
}
