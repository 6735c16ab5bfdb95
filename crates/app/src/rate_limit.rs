//! In-process sliding-window rate limiter.
//!
//! Counters live in memory and reset on restart. Several server instances
//! each keep their own window.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Arc;

use chrono::Duration;
use eodsa_domain::error::EodsaError;
use eodsa_domain::time::{Timestamp, now};
use tokio::sync::Mutex;

use crate::ports::RateLimiter;

/// Registrations allowed per client within [`REGISTRATION_WINDOW_MINUTES`].
pub const REGISTRATIONS_PER_WINDOW: usize = 3;
pub const REGISTRATION_WINDOW_MINUTES: i64 = 60;

/// Allows at most `limit` attempts per client within a rolling `window`.
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    limit: usize,
    window: Duration,
    attempts: Arc<Mutex<HashMap<IpAddr, VecDeque<Timestamp>>>>,
}

impl SlidingWindowLimiter {
    #[must_use]
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The registration quota: 3 per client per hour.
    #[must_use]
    pub fn for_registrations() -> Self {
        Self::new(
            REGISTRATIONS_PER_WINDOW,
            Duration::minutes(REGISTRATION_WINDOW_MINUTES),
        )
    }

    /// Record an attempt at `at`, returning `false` when over quota.
    pub async fn acquire_at(&self, client: IpAddr, at: Timestamp) -> bool {
        let mut attempts = self.attempts.lock().await;
        let horizon = at - self.window;
        // Drop idle clients so the map does not grow without bound.
        attempts.retain(|_, seen| seen.back().is_some_and(|last| *last > horizon));

        let seen = attempts.entry(client).or_default();
        while seen.front().is_some_and(|first| *first <= horizon) {
            seen.pop_front();
        }
        if seen.len() >= self.limit {
            tracing::warn!(%client, limit = self.limit, "registration rate limit hit");
            return false;
        }
        seen.push_back(at);
        true
    }
}

impl RateLimiter for SlidingWindowLimiter {
    async fn try_acquire(&self, client: IpAddr) -> Result<bool, EodsaError> {
        Ok(self.acquire_at(client, now()).await)
    }
}
