// ABOUTME: Time source for polling loops.
// ABOUTME: Lets tests drive waits with a simulated clock instead of real sleeps.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Source of the current time and of delays.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall-clock time backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
