//! Pacing between outbound profile fetches.

use std::time::Duration;

use async_trait::async_trait;
use instascore_core::AppConfig;
use rand::Rng;

/// Runs before every outbound profile fetch.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn wait(&self);
}

/// Sleeps a uniformly random duration in `[min_ms, max_ms]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDelay {
    min_ms: u64,
    max_ms: u64,
}

impl RandomDelay {
    /// Bounds are swapped if given in the wrong order.
    #[must_use]
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.throttle_min_ms, config.throttle_max_ms)
    }

    fn pick_ms(&self) -> u64 {
        rand::rng().random_range(self.min_ms..=self.max_ms)
    }
}

#[async_trait]
impl Throttle for RandomDelay {
    async fn wait(&self) {
        let delay_ms = self.pick_ms();
        tracing::debug!(delay_ms, "throttling before fetch");
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// No pacing at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Throttle for NoDelay {
    async fn wait(&self) {}
}
