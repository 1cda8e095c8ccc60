use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::settings::AppConfig;

/// A token bucket which allows fractional tokens for precise refill
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        let now = Instant::now();
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: now,
            last_seen: now,
        }
    }

    /// Refill tokens based on elapsed time. Uses double precision arithmetic.
    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Try to consume one token. Small epsilon to avoid fp surprises
    fn try_consume(&mut self, now: Instant) -> bool {
        self.refill(now);
        self.last_seen = now;
        if self.tokens + 1e-12 >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Whole seconds until the next token is available, at least 1.
    fn retry_after(&self) -> u64 {
        let tokens_needed = (1.0 - self.tokens).max(0.0);
        ((tokens_needed / self.refill_per_sec).ceil() as u64).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: u64 },
}

type Key = String;

/// Per-client login throttle. Buckets are created on first use and evicted
/// once idle for longer than `bucket_ttl`.
#[derive(Clone)]
pub struct LoginRateLimiter {
    map: Arc<DashMap<Key, Arc<Mutex<TokenBucket>>>>,
    capacity: f64,
    refill_per_sec: f64,
    bucket_ttl: Duration,
}

impl LoginRateLimiter {
    pub fn new(capacity: u32, refill_per_minute: u32, bucket_ttl: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            capacity: capacity.max(1) as f64,
            refill_per_sec: refill_per_minute.max(1) as f64 / 60.0,
            bucket_ttl,
        }
    }

    fn get_bucket(&self, key: &str) -> Arc<Mutex<TokenBucket>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TokenBucket::new(self.capacity, self.refill_per_sec))))
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let bucket = self.get_bucket(key);
        let mut bucket = bucket.lock();
        if bucket.try_consume(Instant::now()) {
            RateDecision::Allowed
        } else {
            RateDecision::Limited { retry_after: bucket.retry_after() }
        }
    }

    /// Drops buckets idle for longer than the configured TTL. Returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, bucket| now.duration_since(bucket.lock().last_seen) <= self.bucket_ttl);
        before - self.map.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }
}

impl From<&AppConfig> for LoginRateLimiter {
    fn from(config: &AppConfig) -> Self {
        LoginRateLimiter::new(
            config.login_burst,
            config.login_refill_per_minute,
            Duration::from_secs(15 * 60),
        )
    }
}
