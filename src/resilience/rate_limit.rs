//! Per-endpoint fixed-window rate limiting.
//!
//! A plain fixed-window counter: the window resets once its span has
//! elapsed, and a call is admitted only while the counter is below the
//! endpoint's cap. Bursts of up to twice the nominal rate across a
//! window boundary are a known property of this algorithm, kept as-is.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::EndpointConfig;

#[derive(Debug)]
struct Window {
    count: u32,
    started: Instant,
}

/// Fixed-window request counter keyed by endpoint id.
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to admit one call to the given endpoint.
    ///
    /// Admission increments the window counter; rejection leaves it
    /// untouched so a full window stays full until it expires.
    pub fn try_acquire(&self, endpoint: &EndpointConfig) -> bool {
        self.acquire(
            &endpoint.id,
            endpoint.rate_limit.max_requests,
            Duration::from_secs(endpoint.rate_limit.window_secs),
        )
    }

    fn acquire(&self, id: &str, cap: u32, window: Duration) -> bool {
        let mut w = self.windows.entry(id.to_string()).or_insert_with(|| Window {
            count: 0,
            started: Instant::now(),
        });
        if w.started.elapsed() > window {
            w.count = 0;
            w.started = Instant::now();
        }
        if w.count < cap {
            w.count += 1;
            true
        } else {
            false
        }
    }
}
