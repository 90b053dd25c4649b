//! Queryable per-endpoint request metrics.
//!
//! # Responsibilities
//! - Count logical calls (not individual retry attempts) per endpoint
//! - Maintain a running mean of successful response times
//! - Serve point and full-table snapshots to callers and the CLI
//!
//! # Design Decisions
//! - One accounting event per logical call: the orchestrator records
//!   the final outcome once, after the retry loop settles
//! - The mean divides by the post-increment total request count, so
//!   interleaved failures dilute it; with all-success traffic it is the
//!   exact arithmetic mean
//! - Reads never fail: unknown ids are `None`, not a panic

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use serde::Serialize;

/// Rolling counters for one endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EndpointMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Running mean over successful calls, in milliseconds.
    pub average_response_time_ms: f64,
    /// Epoch milliseconds of the most recent completed call.
    pub last_request_ms: Option<u64>,
}

/// Per-endpoint metrics table, populated for every registry id at
/// startup and updated by the orchestrator.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    entries: DashMap<String, EndpointMetrics>,
}

impl StatsRecorder {
    /// Create a recorder with zeroed entries for the given ids.
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let entries = DashMap::new();
        for id in ids {
            entries.insert(id.to_string(), EndpointMetrics::default());
        }
        Self { entries }
    }

    /// Record one successful logical call and fold its latency into the
    /// running mean.
    pub fn record_success(&self, id: &str, elapsed_ms: u64) {
        let mut m = self.entries.entry(id.to_string()).or_default();
        m.total_requests += 1;
        m.successful_requests += 1;
        let n = m.total_requests as f64;
        m.average_response_time_ms =
            (m.average_response_time_ms * (n - 1.0) + elapsed_ms as f64) / n;
        m.last_request_ms = Some(epoch_ms());
    }

    /// Record one logical call that exhausted its retries.
    pub fn record_failure(&self, id: &str) {
        let mut m = self.entries.entry(id.to_string()).or_default();
        m.total_requests += 1;
        m.failed_requests += 1;
        m.last_request_ms = Some(epoch_ms());
    }

    /// Snapshot one endpoint's counters.
    pub fn get(&self, id: &str) -> Option<EndpointMetrics> {
        self.entries.get(id).map(|m| m.clone())
    }

    /// Snapshot the whole table.
    pub fn all(&self) -> HashMap<String, EndpointMetrics> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
