use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    DeserializationError(String),

    #[error("Failed to encode request: {0}")]
    SerializationError(String),
}

impl ExchangeError {
    /// HTTP status carried by an API error, if this is one
    pub fn api_status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::ApiError { .. })
    }

    /// True when the server accepted the call but the body had an unexpected shape
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::DeserializationError(_))
    }

    /// True for failures raised before any network I/O took place
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_)
                | Self::AuthError(_)
                | Self::InvalidParameters(_)
                | Self::SerializationError(_)
        )
    }
}
