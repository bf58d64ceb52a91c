// ABOUTME: Clock implementation that advances instantly on sleep.
// ABOUTME: Lets timeout paths run in milliseconds while reporting simulated elapsed time.

use async_trait::async_trait;
use marathon_deploy::deploy::Clock;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub struct SimulatedClock {
    base: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Total simulated time slept so far.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }

    /// Every sleep requested, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for SimulatedClock {
    fn now(&self) -> Instant {
        self.base + *self.elapsed.lock()
    }

    async fn sleep(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
        self.sleeps.lock().push(duration);
        tokio::task::yield_now().await;
    }
}
