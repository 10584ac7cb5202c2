/// Signed REST kernel
///
/// Everything an endpoint call goes through on its way to the wire lives
/// here; endpoint modules only supply a method, a path, an optional body and
/// optional query parameters.
///
/// # Pipeline
///
/// 1. `query` encodes the parameters (sorted, empties dropped); `rest` joins
///    the path onto the base URL, percent-encodes it and attaches the query.
///    The path and query of that URL are the canonical request path.
/// 2. `signer` signs `timestamp + METHOD + request_path + body` with
///    HMAC-SHA256 and produces the four `X-ACCESS-*` headers.
/// 3. `rest` attaches those plus `User-Agent`, `Content-Type` and `Accept`,
///    hands the request to the `Transport`, and maps the response: 200 is
///    decoded into the caller's type, anything else becomes an API error.
///
/// The timestamp comes from an injectable `Clock` and is read inside
/// `RestClient::build_request`, right before the request is sent.
///
/// # Example
/// ```rust,no_run
/// use prorest::core::kernel::*;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = HmacSigner::new(
///     "api_key".to_string(),
///     "c2VjcmV0".to_string(),
///     "passphrase".to_string(),
/// )?;
/// let rest = RestClientBuilder::new(RestClientConfig::new(
///     "https://api-public.sandbox.pro.coinbase.com".to_string(),
///     "pro".to_string(),
/// ))
/// .with_signer(Arc::new(signer))
/// .build()?;
///
/// let params = QueryParams::new().with(Param::ProductId, "BTC-USD");
/// let fills: Vec<serde_json::Value> = rest.get_json("/fills", Some(&params)).await?;
/// # Ok(())
/// # }
/// ```
pub mod clock;
pub mod query;
pub mod rest;
pub mod signer;
pub mod transport;

// Re-export key types for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use query::{Param, QueryParams};
pub use rest::{RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{sign, HmacSigner, SignatureResult, Signer, SigningContext};
pub use transport::{ReqwestTransport, RestRequest, RestResponse, Transport};
