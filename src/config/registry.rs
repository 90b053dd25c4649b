//! Static endpoint registry.
//!
//! # Responsibilities
//! - Hold the per-environment endpoint tables (production, development)
//! - Select exactly one table at process start from the environment flag
//! - Resolve endpoint ids to descriptors
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Unknown id is an explicit `None`, surfaced by the client as an
//!   unknown-endpoint error rather than a network failure
//! - Both tables carry the same ids; only base URLs and VPN flags differ

use std::collections::HashMap;

use crate::config::schema::{AuthScheme, EndpointConfig, Environment, RateLimitConfig};

/// Lookup table of upstream endpoints for one environment.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    environment: Environment,
    endpoints: HashMap<String, EndpointConfig>,
}

impl EndpointRegistry {
    /// Build the registry for the environment given by `GATEWAY_ENV`.
    pub fn from_env() -> Self {
        Self::for_environment(Environment::from_env())
    }

    /// Build the built-in registry for a specific environment.
    pub fn for_environment(environment: Environment) -> Self {
        let table = match environment {
            Environment::Production => production_endpoints(),
            Environment::Development => development_endpoints(),
        };
        Self::from_endpoints(environment, table)
    }

    /// Build a registry from an explicit endpoint list.
    ///
    /// Later duplicates replace earlier ones; the loader validates
    /// uniqueness before calling this.
    pub fn from_endpoints(environment: Environment, endpoints: Vec<EndpointConfig>) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();
        Self {
            environment,
            endpoints,
        }
    }

    /// Look up an endpoint descriptor by id.
    pub fn get(&self, id: &str) -> Option<&EndpointConfig> {
        self.endpoints.get(id)
    }

    /// All endpoint ids, sorted for stable output.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all endpoint descriptors.
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointConfig> {
        self.endpoints.values()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

fn endpoint(
    id: &str,
    base_url: &str,
    health_check_path: &str,
    auth: AuthScheme,
    max_requests: u32,
    window_secs: u64,
    timeout_ms: u64,
    retry_attempts: u32,
    requires_vpn: bool,
) -> EndpointConfig {
    EndpointConfig {
        id: id.to_string(),
        base_url: base_url.to_string(),
        health_check_path: health_check_path.to_string(),
        auth,
        rate_limit: RateLimitConfig {
            max_requests,
            window_secs,
        },
        timeout_ms,
        retry_attempts,
        requires_vpn,
    }
}

/// Production endpoint table.
///
/// e-invoicing and financial-regulator sit behind the agency VPN in
/// production; their sandboxes are publicly reachable.
fn production_endpoints() -> Vec<EndpointConfig> {
    vec![
        endpoint(
            "tax-authority",
            "https://api.eta.gov.eg/api/v1",
            "/health",
            AuthScheme::Bearer,
            60,
            60,
            30_000,
            3,
            false,
        ),
        endpoint(
            "e-invoicing",
            "https://invoicing.eta.gov.eg/api/v1",
            "/health",
            AuthScheme::Oauth2,
            30,
            60,
            45_000,
            3,
            true,
        ),
        endpoint(
            "e-receipt",
            "https://receipts.eta.gov.eg/api/v1",
            "/health",
            AuthScheme::Oauth2,
            30,
            60,
            45_000,
            2,
            false,
        ),
        endpoint(
            "commercial-registry",
            "https://api.gafi.gov.eg/registry/v1",
            "/health",
            AuthScheme::ApiKey,
            20,
            60,
            20_000,
            2,
            false,
        ),
        endpoint(
            "financial-regulator",
            "https://api.fra.gov.eg/v1",
            "/health",
            AuthScheme::ApiKey,
            10,
            60,
            20_000,
            1,
            true,
        ),
        endpoint(
            "ai-assistant",
            "https://assistant.auditera.io/v1",
            "/status",
            AuthScheme::Bearer,
            120,
            60,
            60_000,
            1,
            false,
        ),
    ]
}

/// Development endpoint table: same ids, sandbox hosts, no VPN.
fn development_endpoints() -> Vec<EndpointConfig> {
    vec![
        endpoint(
            "tax-authority",
            "https://api.preprod.eta.gov.eg/api/v1",
            "/health",
            AuthScheme::Bearer,
            60,
            60,
            30_000,
            3,
            false,
        ),
        endpoint(
            "e-invoicing",
            "https://invoicing.preprod.eta.gov.eg/api/v1",
            "/health",
            AuthScheme::Oauth2,
            30,
            60,
            45_000,
            3,
            false,
        ),
        endpoint(
            "e-receipt",
            "https://receipts.preprod.eta.gov.eg/api/v1",
            "/health",
            AuthScheme::Oauth2,
            30,
            60,
            45_000,
            2,
            false,
        ),
        endpoint(
            "commercial-registry",
            "https://sandbox.gafi.gov.eg/registry/v1",
            "/health",
            AuthScheme::ApiKey,
            20,
            60,
            20_000,
            2,
            false,
        ),
        endpoint(
            "financial-regulator",
            "https://sandbox.fra.gov.eg/v1",
            "/health",
            AuthScheme::ApiKey,
            10,
            60,
            20_000,
            1,
            false,
        ),
        endpoint(
            "ai-assistant",
            "https://assistant.staging.auditera.io/v1",
            "/status",
            AuthScheme::Bearer,
            120,
            60,
            60_000,
            1,
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_carry_same_ids() {
        let prod = EndpointRegistry::for_environment(Environment::Production);
        let dev = EndpointRegistry::for_environment(Environment::Development);
        assert_eq!(prod.ids(), dev.ids());
        assert_eq!(prod.len(), 6);
    }

    #[test]
    fn test_tables_differ_only_in_url_and_vpn() {
        let prod = EndpointRegistry::for_environment(Environment::Production);
        let dev = EndpointRegistry::for_environment(Environment::Development);
        for id in prod.ids() {
            let p = prod.get(id).unwrap();
            let d = dev.get(id).unwrap();
            assert_ne!(p.base_url, d.base_url, "{id} should use a sandbox host in dev");
            assert_eq!(p.auth, d.auth);
            assert_eq!(p.timeout_ms, d.timeout_ms);
            assert_eq!(p.retry_attempts, d.retry_attempts);
            assert_eq!(p.rate_limit.max_requests, d.rate_limit.max_requests);
        }
    }

    #[test]
    fn test_vpn_endpoints_in_production() {
        let prod = EndpointRegistry::for_environment(Environment::Production);
        let vpn: Vec<&str> = prod
            .endpoints()
            .filter(|e| e.requires_vpn)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(vpn.len(), 2);
        assert!(vpn.contains(&"e-invoicing"));
        assert!(vpn.contains(&"financial-regulator"));
    }

    #[test]
    fn test_unknown_id_is_none() {
        let reg = EndpointRegistry::for_environment(Environment::Development);
        assert!(reg.get("does-not-exist").is_none());
    }
}
