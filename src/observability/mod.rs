//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator outcomes:
//!     → stats.rs (queryable per-endpoint table, served to callers)
//!     → metrics.rs (process counters/histograms, Prometheus scrape)
//!     → tracing events tagged with endpoint + request id
//! ```
//!
//! # Design Decisions
//! - Two metric surfaces on purpose: callers poll the stats table for
//!   fallback decisions; operators scrape the Prometheus exporter
//! - Stats updates are cheap per-entry map writes, no global lock

pub mod logging;
pub mod metrics;
pub mod stats;

pub use stats::{EndpointMetrics, StatsRecorder};
