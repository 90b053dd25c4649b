//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! GATEWAY_ENV flag (read once at process start)
//!     → registry.rs (select production or development table)
//!     → EndpointRegistry (validated, immutable)
//!     → shared via Arc-owned client to all callers
//!
//! Optional override:
//!     endpoints.toml → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EndpointRegistry
//! ```
//!
//! # Design Decisions
//! - The registry is immutable once built; no hot reload
//! - Validation separates syntactic (serde) from semantic checks
//! - Unknown ids are explicit `None`, never a silent default endpoint

pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;

pub use registry::EndpointRegistry;
pub use schema::{AuthScheme, EndpointConfig, Environment, RateLimitConfig};
