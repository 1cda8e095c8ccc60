use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::LoginRateLimiter;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically drops idle login throttle buckets.
pub async fn start_limiter_eviction_task(limiter: LoginRateLimiter) {
    let mut interval = interval(EVICTION_INTERVAL);

    loop {
        interval.tick().await;

        let evicted = limiter.evict_idle();
        if evicted > 0 {
            tracing::debug!("Evicted {} idle login rate-limit buckets", evicted);
        }
    }
}
