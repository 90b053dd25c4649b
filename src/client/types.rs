//! Client-facing types and error taxonomy.

use reqwest::header::HeaderMap;
use reqwest::Method;
use thiserror::Error;

/// A single attempt's transport-level failure.
///
/// This is the only error class the retry loop acts on; everything
/// else fails fast.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The attempt exceeded the endpoint's hard timeout and was aborted.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Connection-level failure (DNS, refused, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned {status} {reason}")]
    Status { status: u16, reason: String },

    /// The 2xx body could not be decoded as the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Errors surfaced by [`crate::client::GatewayClient::execute`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The id is not in the registry. Fatal to the call; nothing else
    /// is touched.
    #[error("unknown endpoint '{0}'")]
    UnknownEndpoint(String),

    /// The circuit is open; callers should fall back rather than retry.
    #[error("circuit open for endpoint '{0}'")]
    CircuitOpen(String),

    /// The fixed rate window is exhausted.
    #[error("rate limit exceeded for endpoint '{0}'")]
    RateLimited(String),

    /// Every attempt failed; wraps the last transport error.
    #[error("request to '{endpoint}' failed after {attempts} attempts")]
    Exhausted {
        endpoint: String,
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Init(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Per-call options for [`crate::client::GatewayClient::execute`].
///
/// Caller-supplied headers override the computed auth and request-id
/// headers on collision; the fixed `Content-Type`/`Accept` JSON pair
/// always wins, since the client only decodes JSON responses.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// A plain GET with no extra headers.
    pub fn get() -> Self {
        Self::default()
    }

    /// A POST carrying a JSON body.
    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    /// Attach an extra header to this call.
    pub fn header(
        mut self,
        name: reqwest::header::HeaderName,
        value: reqwest::header::HeaderValue,
    ) -> Self {
        self.headers.insert(name, value);
        self
    }
}
