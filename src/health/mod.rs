//! Active health checking for configured upstreams.

pub mod monitor;

pub use monitor::HealthMonitor;
