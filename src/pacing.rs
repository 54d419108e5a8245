//! Request pacing between page advances.
//!
//! Keeps the traversal from hammering the remote service and tripping its
//! anti-automation defenses. The delay is a cooperative suspension point
//! (`tokio::time::sleep`), never a blocking wait.

use crate::config::DelayPolicy;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Produces the delay applied before each page advance.
pub struct RateLimiter {
    policy: DelayPolicy,
}

impl RateLimiter {
    pub fn new(policy: DelayPolicy) -> Self {
        Self { policy }
    }

    /// Next delay under the configured policy. Random draws are independent
    /// per call — no autocorrelation, no escalation.
    pub fn next_delay(&self) -> Duration {
        let ms = match self.policy {
            DelayPolicy::Fixed(ms) => ms,
            DelayPolicy::Random { min, max } => rand::thread_rng().gen_range(min..=max),
        };
        Duration::from_millis(ms)
    }

    /// Suspend for one delay.
    pub async fn pause(&self) {
        let delay = self.next_delay();
        debug!(delay_ms = delay.as_millis() as u64, "pacing before page advance");
        tokio::time::sleep(delay).await;
    }
}
