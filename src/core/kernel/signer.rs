use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

pub const ACCESS_KEY_HEADER: &str = "X-ACCESS-KEY";
pub const ACCESS_SIGN_HEADER: &str = "X-ACCESS-SIGN";
pub const ACCESS_TIMESTAMP_HEADER: &str = "X-ACCESS-TIMESTAMP";
pub const ACCESS_PASSPHRASE_HEADER: &str = "X-ACCESS-PASSPHRASE";

/// Result type for signing operations: authentication headers in attach order
pub type SignatureResult = Result<Vec<(&'static str, String)>, ExchangeError>;

/// Everything that goes into one request signature
///
/// Built fresh for every call and dropped as soon as the headers exist. The
/// `request_path` and `body` must be the exact bytes that go on the wire.
#[derive(Debug, Clone)]
pub struct SigningContext<'a> {
    /// Unix seconds, as sent in `X-ACCESS-TIMESTAMP`
    pub timestamp: String,
    pub method: &'a str,
    /// Path plus encoded query string
    pub request_path: &'a str,
    pub body: &'a [u8],
}

impl<'a> SigningContext<'a> {
    pub fn new(timestamp: String, method: &'a str, request_path: &'a str, body: &'a [u8]) -> Self {
        Self {
            timestamp,
            method,
            request_path,
            body,
        }
    }

    /// Sign this context with a base64-encoded secret
    pub fn sign(&self, secret: &str) -> Result<String, ExchangeError> {
        sign(
            secret,
            &self.timestamp,
            self.method,
            self.request_path,
            self.body,
        )
    }
}

/// Compute the `X-ACCESS-SIGN` value
///
/// The prehash is `timestamp + METHOD + request_path + body`, keyed by the
/// base64-decoded secret, and the digest is returned base64 encoded. An empty
/// body still takes part (as the empty string).
pub fn sign(
    secret: &str,
    timestamp: &str,
    method: &str,
    request_path: &str,
    body: &[u8],
) -> Result<String, ExchangeError> {
    let key = Zeroizing::new(
        general_purpose::STANDARD
            .decode(secret)
            .map_err(|e| {
                ExchangeError::AuthError(format!("Secret key is not valid base64: {}", e))
            })?,
    );

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| ExchangeError::AuthError(format!("Failed to create HMAC: {}", e)))?;

    mac.update(timestamp.as_bytes());
    mac.update(method.to_ascii_uppercase().as_bytes());
    mac.update(request_path.as_bytes());
    mac.update(body);

    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Signer trait for request authentication
///
/// Implementations turn a [`SigningContext`] into the headers that
/// authenticate it. The REST kernel calls this once per request, after the
/// query string has been attached.
pub trait Signer: Send + Sync {
    fn sign_request(&self, context: &SigningContext<'_>) -> SignatureResult;
}

/// HMAC-SHA256 signer using key, base64 secret and passphrase
#[derive(Debug, Clone)]
pub struct HmacSigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
    passphrase: Secret<String>,
}

impl HmacSigner {
    /// Create a new HMAC signer
    ///
    /// Fails when the secret is not valid base64, so a bad secret is caught
    /// at construction instead of on the first request.
    pub fn new(
        api_key: String,
        secret_key: String,
        passphrase: String,
    ) -> Result<Self, ExchangeError> {
        general_purpose::STANDARD
            .decode(&secret_key)
            .map_err(|e| {
                ExchangeError::AuthError(format!("Secret key is not valid base64: {}", e))
            })?;

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: Secret::new(passphrase),
        })
    }

    pub fn from_config(config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        config.validate()?;
        Self::new(
            config.api_key().to_string(),
            config.secret_key().to_string(),
            config.passphrase().to_string(),
        )
    }
}

impl Signer for HmacSigner {
    fn sign_request(&self, context: &SigningContext<'_>) -> SignatureResult {
        let signature = context.sign(self.secret_key.expose_secret())?;

        Ok(vec![
            (ACCESS_KEY_HEADER, self.api_key.expose_secret().clone()),
            (ACCESS_SIGN_HEADER, signature),
            (ACCESS_TIMESTAMP_HEADER, context.timestamp.clone()),
            (ACCESS_PASSPHRASE_HEADER, self.passphrase.expose_secret().clone()),
        ])
    }
}
