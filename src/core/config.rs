use base64::{engine::general_purpose, Engine as _};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Live REST endpoint
pub const LIVE_REST_URL: &str = "https://api.pro.coinbase.com";
/// Live streaming endpoint
pub const LIVE_WS_URL: &str = "wss://ws-feed.pro.coinbase.com";
/// Sandbox REST endpoint
pub const SANDBOX_REST_URL: &str = "https://api-public.sandbox.pro.coinbase.com";
/// Sandbox streaming endpoint
pub const SANDBOX_WS_URL: &str = "wss://ws-feed-public.sandbox.pro.coinbase.com";

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub passphrase: Secret<String>,
    pub sandbox: bool,
    pub base_url: Option<String>,
    pub ws_url: Option<String>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 6)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("passphrase", "[REDACTED]")?;
        state.serialize_field("sandbox", &self.sandbox)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("ws_url", &self.ws_url)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            passphrase: String,
            #[serde(default)]
            sandbox: bool,
            base_url: Option<String>,
            ws_url: Option<String>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            passphrase: Secret::new(helper.passphrase),
            sandbox: helper.sandbox,
            base_url: helper.base_url,
            ws_url: helper.ws_url,
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    ///
    /// `secret_key` is the base64-encoded shared secret issued with the key.
    #[must_use]
    pub fn new(api_key: String, secret_key: String, passphrase: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: Secret::new(passphrase),
            sandbox: false,
            base_url: None,
            ws_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_KEY`
    /// - `{PREFIX}_SECRET_KEY` (base64)
    /// - `{PREFIX}_PASSPHRASE`
    /// - `{PREFIX}_SANDBOX` (optional, defaults to false)
    /// - `{PREFIX}_BASE_URL` (optional)
    /// - `{PREFIX}_WS_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let required = |suffix: &str| {
            let var = format!("{}_{}", prefix, suffix);
            match env::var(&var) {
                Ok(value) if !value.is_empty() => Ok(value),
                _ => Err(ConfigError::MissingEnvironmentVariable(var)),
            }
        };

        let api_key = required("API_KEY")?;
        let secret_key = required("SECRET_KEY")?;
        let passphrase = required("PASSPHRASE")?;

        let sandbox = env::var(format!("{}_SANDBOX", prefix))
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let base_url = env::var(format!("{}_BASE_URL", prefix)).ok();
        let ws_url = env::var(format!("{}_WS_URL", prefix)).ok();

        let config = Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: Secret::new(passphrase),
            sandbox,
            base_url,
            ws_url,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration from .env file and environment variables
    ///
    /// Loads `.env` if it exists, then reads the standard variables.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // fall back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Check that every credential is present and the secret decodes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ConfigError::MissingCredential("api key"));
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(ConfigError::MissingCredential("secret key"));
        }
        if self.passphrase.expose_secret().is_empty() {
            return Err(ConfigError::MissingCredential("passphrase"));
        }
        if general_purpose::STANDARD
            .decode(self.secret_key.expose_secret())
            .is_err()
        {
            return Err(ConfigError::InvalidConfiguration(
                "secret key is not valid base64".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if this configuration has credentials for signed requests
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
            && !self.secret_key.expose_secret().is_empty()
            && !self.passphrase.expose_secret().is_empty()
    }

    /// Set sandbox mode
    #[must_use]
    pub const fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set custom REST base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set custom streaming base URL
    #[must_use]
    pub fn ws_url(mut self, ws_url: String) -> Self {
        self.ws_url = Some(ws_url);
        self
    }

    /// REST base URL, honouring an explicit override first
    pub fn rest_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url,
            None if self.sandbox => SANDBOX_REST_URL,
            None => LIVE_REST_URL,
        }
    }

    /// Streaming base URL, honouring an explicit override first
    pub fn streaming_url(&self) -> &str {
        match &self.ws_url {
            Some(url) => url,
            None if self.sandbox => SANDBOX_WS_URL,
            None => LIVE_WS_URL,
        }
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Get passphrase (use carefully - exposes secret)
    pub fn passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Missing credential: please provide a {0}")]
    MissingCredential(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
