use crate::core::errors::ExchangeError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Query parameter names understood by the API
///
/// `Custom` covers any name the API grows that is not listed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Param {
    OrderId,
    ProductId,
    Status,
    /// Order book depth, see `GET /products/{id}/book`
    Level,
    Start,
    End,
    Granularity,
    Currency,
    Custom(String),
}

impl Param {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OrderId => "order_id",
            Self::ProductId => "product_id",
            Self::Status => "status",
            Self::Level => "level",
            Self::Start => "start",
            Self::End => "end",
            Self::Granularity => "granularity",
            Self::Currency => "currency",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        match name {
            "order_id" => Self::OrderId,
            "product_id" => Self::ProductId,
            "status" => Self::Status,
            "level" => Self::Level,
            "start" => Self::Start,
            "end" => Self::End,
            "granularity" => Self::Granularity,
            "currency" => Self::Currency,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for a single call
///
/// Keys are kept sorted by their wire name so the encoded string is the same
/// every time it is produced. An empty value means "not set" and never
/// reaches the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value
    pub fn insert(&mut self, param: Param, value: impl Into<String>) -> &mut Self {
        self.params.insert(param.as_str().to_string(), value.into());
        self
    }

    #[must_use]
    pub fn with(mut self, param: Param, value: impl Into<String>) -> Self {
        self.insert(param, value);
        self
    }

    /// Set `start` and `end` as RFC 3339 timestamps
    #[must_use]
    pub fn with_time_range(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.with(Param::Start, start.to_rfc3339_opts(SecondsFormat::Secs, true))
            .with(Param::End, end.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn get(&self, param: &Param) -> Option<&str> {
        self.params.get(param.as_str()).map(String::as_str)
    }

    /// True when the parameter holds a non-empty value
    pub fn is_set(&self, param: &Param) -> bool {
        self.get(param).is_some_and(|value| !value.is_empty())
    }

    /// True when nothing would be encoded
    pub fn is_empty(&self) -> bool {
        self.params.values().all(String::is_empty)
    }

    /// Form-encode the non-empty parameters in key order, without a leading `?`
    pub fn encode(&self) -> Result<String, ExchangeError> {
        let pairs: Vec<(&str, &str)> = self
            .params
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();

        serde_urlencoded::to_string(pairs).map_err(|e| {
            ExchangeError::InvalidParameters(format!("Failed to encode query string: {}", e))
        })
    }
}

impl<P: Into<Param>, V: Into<String>> FromIterator<(P, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (param, value) in iter {
            params.insert(param.into(), value);
        }
        params
    }
}
