//! Configuration schema definitions.
//!
//! This module defines the endpoint descriptor types shared by the
//! registry, the loader, and the client. All types derive Serde traits
//! so endpoint tables can also be overlaid from config files.

use serde::{Deserialize, Serialize};

/// Which environment's endpoint table to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    /// Resolve the environment from the `GATEWAY_ENV` variable.
    ///
    /// "production" selects the production table; every other value
    /// (including unset) selects development.
    pub fn from_env() -> Self {
        match std::env::var("GATEWAY_ENV") {
            Ok(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }
}

/// Authentication scheme an upstream endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `X-API-Key` header.
    ApiKey,
    /// `Authorization: Bearer <token>` with a long-lived token.
    Bearer,
    /// `Authorization: Bearer <token>` with an OAuth2 access token.
    Oauth2,
    /// `Authorization: Basic <base64(user:pass)>`.
    Basic,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::ApiKey => "api-key",
            AuthScheme::Bearer => "bearer",
            AuthScheme::Oauth2 => "oauth2",
            AuthScheme::Basic => "basic",
        }
    }
}

/// Fixed-window rate limit for a single endpoint.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests admitted per window.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

/// A single upstream endpoint definition.
///
/// Immutable once the registry is built. The same ids exist in both
/// environment tables; only `base_url` and `requires_vpn` differ.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Unique endpoint identifier (e.g., "tax-authority").
    pub id: String,

    /// Base URL, joined with the per-call path.
    pub base_url: String,

    /// Path probed by health checks.
    #[serde(default = "default_health_path")]
    pub health_check_path: String,

    /// Authentication scheme for this endpoint.
    pub auth: AuthScheme,

    /// Fixed-window rate limit.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: RateLimitConfig,

    /// Hard per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first attempt (so `retry_attempts + 1` total
    /// tries on the wire).
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Whether the endpoint is only reachable over the agency VPN.
    #[serde(default)]
    pub requires_vpn: bool,
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_rate_limit() -> RateLimitConfig {
    RateLimitConfig {
        max_requests: 60,
        window_secs: 60,
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_attempts() -> u32 {
    3
}
