//! Exponential backoff schedule between retry attempts.

use std::time::Duration;

const BASE_DELAY_MS: u64 = 1_000;

/// Delay to sleep after failed attempt `attempt` (0-based) before the
/// next try: 1s, 2s, 4s, 8s, ...
///
/// The schedule is deliberately unjittered; upstream rate limits here
/// are per-tenant, so synchronized retries across processes are not a
/// concern the way they are for a shared backend pool.
pub fn retry_delay(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt);
    Duration::from_millis(BASE_DELAY_MS.saturating_mul(factor))
}
