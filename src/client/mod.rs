//! The resilient upstream client.
//!
//! # Data Flow
//! ```text
//! execute(endpoint_id, path, options)
//!     → config (resolve descriptor; unknown id fails fast)
//!     → resilience (circuit gate, rate-limit gate)
//!     → attempt loop (auth headers, timeout, classify, backoff)
//!     → observability (stats + metrics on the final outcome)
//! ```

pub mod gateway;
pub mod types;

pub use gateway::GatewayClient;
pub use types::{GatewayError, GatewayResult, RequestOptions, TransportError};
