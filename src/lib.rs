//! Resilient gateway client for upstream regulatory APIs.
//!
//! The audit platform backend talks to several external services (tax
//! authority, e-invoicing, commercial registry, financial regulator, an
//! AI assistant). Each is an independent fault domain: this crate gates
//! every call on a per-endpoint circuit breaker and a fixed-window rate
//! limit, retries transport failures with a doubling backoff under a
//! hard per-attempt timeout, and keeps per-endpoint request metrics the
//! calling layer uses for its fallback decisions.
//!
//! # Architecture Overview
//!
//! ```text
//!  caller ──▶ GatewayClient::execute(endpoint_id, path, options)
//!               │
//!               ├─ config      registry lookup (unknown id fails fast)
//!               ├─ resilience  circuit gate → rate-limit gate
//!               ├─ security    credential provider → auth header
//!               ├─ attempt loop: dispatch ──timeout──▶ classify
//!               │                   ▲                    │
//!               │                   └── backoff sleep ◀──┘ (on failure)
//!               └─ observability  stats table + metrics facade
//! ```

// Core subsystems
pub mod client;
pub mod config;
pub mod security;

// Failure handling
pub mod resilience;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use client::{GatewayClient, GatewayError, GatewayResult, RequestOptions, TransportError};
pub use config::{EndpointConfig, EndpointRegistry, Environment};
pub use lifecycle::Shutdown;
