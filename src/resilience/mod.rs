//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! execute(endpoint, path):
//!     → circuit_breaker.rs (fail fast while the circuit is open)
//!     → rate_limit.rs (fixed-window admission per endpoint)
//!     → attempt loop with per-attempt timeout
//!     → On failure: backoff.rs (doubling delay, then retry)
//!     → Outcome feeds back into circuit_breaker.rs
//! ```
//!
//! # Design Decisions
//! - Every gate is checked before any network attempt; gate rejections
//!   are never retried
//! - Each endpoint id is an independent fault domain
//! - Retries are bounded by the endpoint's configured attempt count,
//!   with no separate wall-clock budget

pub mod backoff;
pub mod circuit_breaker;
pub mod rate_limit;

pub use circuit_breaker::{BreakerSnapshot, BreakerState, CircuitBreakerTracker};
pub use rate_limit::FixedWindowLimiter;
