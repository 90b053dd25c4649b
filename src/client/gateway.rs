//! The gateway client.
//!
//! # Responsibilities
//! - Resolve endpoint ids against the selected registry
//! - Gate every call on circuit state and the rate window
//! - Run the attempt loop: auth headers, hard timeout, classification,
//!   doubling backoff between tries
//! - Feed final outcomes into the breaker and the metrics tables
//!
//! # Design Decisions
//! - Gate rejections fail before any network attempt and are never
//!   retried; only transport failures enter the loop
//! - One logical call = one breaker event and one metrics event,
//!   recorded after the loop settles
//! - Latency is measured from the start of the whole call, so a
//!   success after retries reports the time the caller actually waited

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::client::types::{GatewayError, GatewayResult, RequestOptions, TransportError};
use crate::config::{EndpointConfig, EndpointRegistry};
use crate::observability::metrics;
use crate::observability::stats::{EndpointMetrics, StatsRecorder};
use crate::resilience::backoff::retry_delay;
use crate::resilience::{BreakerSnapshot, CircuitBreakerTracker, FixedWindowLimiter};
use crate::security::auth::auth_header;
use crate::security::{CredentialProvider, EnvCredentials};

/// Resilient client for the upstream regulatory APIs.
///
/// One instance per process; the breaker, rate-limit, and metrics
/// tables live as long as the instance and are never persisted.
pub struct GatewayClient {
    http: reqwest::Client,
    registry: EndpointRegistry,
    credentials: Arc<dyn CredentialProvider>,
    breaker: CircuitBreakerTracker,
    limiter: FixedWindowLimiter,
    stats: StatsRecorder,
}

impl GatewayClient {
    /// Create a client over the given registry and credential source.
    pub fn new(
        registry: EndpointRegistry,
        credentials: Arc<dyn CredentialProvider>,
    ) -> GatewayResult<Self> {
        Self::with_breaker(registry, credentials, CircuitBreakerTracker::default())
    }

    /// Create a client with an explicit breaker configuration.
    ///
    /// Tests use this to shrink the cooldown; production code should
    /// prefer [`GatewayClient::new`].
    pub fn with_breaker(
        registry: EndpointRegistry,
        credentials: Arc<dyn CredentialProvider>,
        breaker: CircuitBreakerTracker,
    ) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| GatewayError::Init(e.to_string()))?;
        let stats = StatsRecorder::new(registry.ids());

        tracing::info!(
            environment = registry.environment().as_str(),
            endpoints = registry.len(),
            "Gateway client initialized"
        );

        Ok(Self {
            http,
            registry,
            credentials,
            breaker,
            limiter: FixedWindowLimiter::new(),
            stats,
        })
    }

    /// Built-in registry selected by `GATEWAY_ENV`, credentials from
    /// the environment.
    pub fn from_env() -> GatewayResult<Self> {
        Self::new(EndpointRegistry::from_env(), Arc::new(EnvCredentials::new()))
    }

    /// Execute one logical call against an endpoint.
    ///
    /// Runs `retry_attempts + 1` tries (the configured value counts
    /// retries after the first attempt), sleeping 1s, 2s, 4s, ...
    /// between failures. Circuit-open, rate-limited, and
    /// unknown-endpoint rejections fail fast without touching the
    /// attempt loop or the metrics table.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        endpoint_id: &str,
        path: &str,
        options: RequestOptions,
    ) -> GatewayResult<T> {
        let started = Instant::now();

        let endpoint = self
            .registry
            .get(endpoint_id)
            .ok_or_else(|| GatewayError::UnknownEndpoint(endpoint_id.to_string()))?;

        if self.breaker.is_open(endpoint_id) {
            metrics::record_rejected(endpoint_id, "circuit_open");
            return Err(GatewayError::CircuitOpen(endpoint_id.to_string()));
        }

        if !self.limiter.try_acquire(endpoint) {
            metrics::record_rejected(endpoint_id, "rate_limited");
            tracing::warn!(endpoint = endpoint_id, "Rate limit window exhausted");
            return Err(GatewayError::RateLimited(endpoint_id.to_string()));
        }

        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}{}", endpoint.base_url, path);
        let headers = self.build_headers(endpoint, &options, &request_id);
        let total_attempts = endpoint.retry_attempts + 1;
        let mut last_error: Option<TransportError> = None;

        for attempt in 0..total_attempts {
            tracing::debug!(
                endpoint = endpoint_id,
                request_id = %request_id,
                attempt,
                method = %options.method,
                url = %url,
                "Dispatching request"
            );

            match self
                .attempt::<T>(endpoint, &url, &options, headers.clone())
                .await
            {
                Ok(body) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    self.stats.record_success(endpoint_id, elapsed_ms);
                    self.breaker.record_success(endpoint_id);
                    metrics::record_request(endpoint_id, "success", started);
                    return Ok(body);
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = endpoint_id,
                        request_id = %request_id,
                        attempt,
                        error = %e,
                        "Attempt failed"
                    );
                    last_error = Some(e);

                    if attempt + 1 < total_attempts {
                        let delay = retry_delay(attempt);
                        tracing::info!(
                            endpoint = endpoint_id,
                            request_id = %request_id,
                            delay = ?delay,
                            "Retrying after backoff"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        self.breaker.record_failure(endpoint_id);
        self.stats.record_failure(endpoint_id);
        metrics::record_request(endpoint_id, "failure", started);

        Err(GatewayError::Exhausted {
            endpoint: endpoint_id.to_string(),
            attempts: total_attempts,
            source: last_error.unwrap_or_else(|| {
                TransportError::Network("request failed with no recorded error".to_string())
            }),
        })
    }

    /// Probe the endpoint's health path through the full pipeline.
    ///
    /// An open circuit or exhausted rate window reports unhealthy; the
    /// probe never bypasses the gates.
    pub async fn health_check(&self, endpoint_id: &str) -> bool {
        let Some(endpoint) = self.registry.get(endpoint_id) else {
            return false;
        };
        let path = endpoint.health_check_path.clone();
        match self
            .execute::<serde_json::Value>(endpoint_id, &path, RequestOptions::get())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(endpoint = endpoint_id, error = %e, "Health check failed");
                false
            }
        }
    }

    /// Metrics snapshot for one endpoint, `None` for unknown ids.
    pub fn metrics(&self, endpoint_id: &str) -> Option<EndpointMetrics> {
        self.stats.get(endpoint_id)
    }

    /// Metrics snapshot for every known endpoint.
    pub fn all_metrics(&self) -> HashMap<String, EndpointMetrics> {
        self.stats.all()
    }

    /// Breaker snapshot for one endpoint, `None` before any failure.
    pub fn breaker_state(&self, endpoint_id: &str) -> Option<BreakerSnapshot> {
        self.breaker.snapshot(endpoint_id)
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// One wire attempt: dispatch with the hard timeout and classify
    /// the outcome.
    async fn attempt<T: DeserializeOwned>(
        &self,
        endpoint: &EndpointConfig,
        url: &str,
        options: &RequestOptions,
        headers: HeaderMap,
    ) -> Result<T, TransportError> {
        let mut request = self
            .http
            .request(options.method.clone(), url)
            .headers(headers)
            .timeout(Duration::from_millis(endpoint.timeout_ms));
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    timeout_ms: endpoint.timeout_ms,
                }
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    timeout_ms: endpoint.timeout_ms,
                }
            } else {
                TransportError::Decode(e.to_string())
            }
        })
    }

    /// Merge computed, caller, and fixed headers.
    ///
    /// Callers override the computed headers (request id, auth), but
    /// the fixed JSON pair goes in last: the client only ever decodes
    /// JSON, so it must not advertise anything else.
    fn build_headers(
        &self,
        endpoint: &EndpointConfig,
        options: &RequestOptions,
        request_id: &str,
    ) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(request_id) {
            headers.insert("x-request-id", v);
        }
        if let Some((name, value)) = auth_header(endpoint, self.credentials.as_ref()) {
            headers.insert(name, value);
        }
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("environment", &self.registry.environment())
            .field("endpoints", &self.registry.len())
            .finish()
    }
}
