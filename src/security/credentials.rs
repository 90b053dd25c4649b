//! Credential resolution for upstream endpoints.
//!
//! # Responsibilities
//! - Define the provider seam the client pulls secrets through
//! - Map endpoint ids to environment variable names deterministically
//! - Offer an in-memory provider for tests and embedding
//!
//! # Design Decisions
//! - The client never reads the environment directly; the provider is
//!   injected so deployments can swap in a vault-backed implementation
//! - A missing credential is `None`, not an error: the request goes out
//!   unauthenticated and the upstream decides
//! - Secrets stay `String`s handed straight to header construction and
//!   are never logged

use std::collections::HashMap;

use crate::config::AuthScheme;

/// Source of per-endpoint secrets.
pub trait CredentialProvider: Send + Sync {
    /// Fetch the secret for an endpoint, if one is configured.
    ///
    /// For `Basic` the expected form is `user:password`.
    fn credential(&self, endpoint_id: &str, scheme: AuthScheme) -> Option<String>;
}

/// Resolves credentials from process environment variables.
///
/// The variable name derives from the endpoint id: uppercased, hyphens
/// replaced with underscores, suffixed by scheme. `tax-authority` with
/// bearer auth reads `TAX_AUTHORITY_ACCESS_TOKEN`.
#[derive(Debug, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    pub fn new() -> Self {
        Self
    }

    /// The environment variable consulted for an endpoint/scheme pair.
    pub fn var_name(endpoint_id: &str, scheme: AuthScheme) -> String {
        let prefix: String = endpoint_id
            .chars()
            .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        let suffix = match scheme {
            AuthScheme::ApiKey => "_API_KEY",
            AuthScheme::Bearer => "_ACCESS_TOKEN",
            AuthScheme::Oauth2 => "_OAUTH_TOKEN",
            AuthScheme::Basic => "_BASIC_CREDENTIALS",
        };
        format!("{prefix}{suffix}")
    }
}

impl CredentialProvider for EnvCredentials {
    fn credential(&self, endpoint_id: &str, scheme: AuthScheme) -> Option<String> {
        let var = Self::var_name(endpoint_id, scheme);
        match std::env::var(&var) {
            Ok(v) if !v.is_empty() => Some(v),
            _ => None,
        }
    }
}

/// Fixed in-memory credentials, keyed by endpoint id.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    secrets: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, endpoint_id: &str, secret: &str) -> Self {
        self.secrets.insert(endpoint_id.to_string(), secret.to_string());
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn credential(&self, endpoint_id: &str, _scheme: AuthScheme) -> Option<String> {
        self.secrets.get(endpoint_id).cloned()
    }
}
