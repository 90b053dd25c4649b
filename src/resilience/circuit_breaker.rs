//! Per-endpoint circuit breaker.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: upstream assumed down, requests fail fast
//! - Half-Open: cooldown elapsed, one trial call allowed
//!
//! # State Transitions
//! ```text
//! Closed → Open: 5 consecutive failures
//! Open → Half-Open: cooldown (60s) elapses, observed at the next gate check
//! Half-Open → Closed: trial call succeeds
//! Half-Open → Open: trial call fails (failure count keeps incrementing)
//! ```
//!
//! # Design Decisions
//! - Per-endpoint breaker (not global): one failing government API must
//!   not block calls to healthy ones
//! - Fail fast in Open state, before any network attempt
//! - Half-Open is not a counter, just permission for the next call;
//!   the failure count survives until a success resets it

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

/// Consecutive failures before the circuit opens.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// How long an open circuit rejects calls before allowing a trial.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(60_000);

/// Breaker state for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct BreakerEntry {
    failure_count: u32,
    last_failure: Instant,
    state: BreakerState,
}

/// Read-only view of one endpoint's breaker entry.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub failure_count: u32,
    pub state: BreakerState,
    /// Milliseconds since the most recent recorded failure.
    pub since_last_failure_ms: u64,
}

/// Tracks failure streaks per endpoint id.
///
/// Entries are created lazily on the first recorded failure and live
/// for the process lifetime.
#[derive(Debug)]
pub struct CircuitBreakerTracker {
    entries: DashMap<String, BreakerEntry>,
    threshold: u32,
    cooldown: Duration,
}

impl CircuitBreakerTracker {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            threshold,
            cooldown,
        }
    }

    /// Returns true iff the circuit is open and still cooling down.
    ///
    /// When the cooldown has elapsed this flips the entry to Half-Open
    /// and returns false, letting exactly the next call through as a
    /// trial.
    pub fn is_open(&self, id: &str) -> bool {
        let Some(mut entry) = self.entries.get_mut(id) else {
            return false;
        };
        if entry.state != BreakerState::Open {
            return false;
        }
        if entry.last_failure.elapsed() >= self.cooldown {
            entry.state = BreakerState::HalfOpen;
            tracing::info!(endpoint = id, "Circuit cooldown elapsed, allowing trial call");
            return false;
        }
        true
    }

    /// Record a successful call: the streak ends and the circuit closes.
    ///
    /// No-op if the endpoint has never failed (no entry is created).
    pub fn record_success(&self, id: &str) {
        if let Some(mut entry) = self.entries.get_mut(id) {
            if entry.state != BreakerState::Closed {
                tracing::info!(endpoint = id, "Circuit closed after successful call");
            }
            entry.failure_count = 0;
            entry.state = BreakerState::Closed;
        }
    }

    /// Record a failed call, opening the circuit at the threshold.
    pub fn record_failure(&self, id: &str) {
        let mut entry = self.entries.entry(id.to_string()).or_insert(BreakerEntry {
            failure_count: 0,
            last_failure: Instant::now(),
            state: BreakerState::Closed,
        });
        entry.failure_count += 1;
        entry.last_failure = Instant::now();
        if entry.failure_count >= self.threshold && entry.state != BreakerState::Open {
            entry.state = BreakerState::Open;
            tracing::warn!(
                endpoint = id,
                failures = entry.failure_count,
                "Circuit opened"
            );
        }
    }

    /// Snapshot one endpoint's breaker entry, if it exists.
    pub fn snapshot(&self, id: &str) -> Option<BreakerSnapshot> {
        self.entries.get(id).map(|e| BreakerSnapshot {
            failure_count: e.failure_count,
            state: e.state,
            since_last_failure_ms: e.last_failure.elapsed().as_millis() as u64,
        })
    }
}

impl Default for CircuitBreakerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD, DEFAULT_COOLDOWN)
    }
}
