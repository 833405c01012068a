//! Timing of source fetches.

use std::future::Future;
use std::time::{Duration, Instant};

/// Emits a timing event for every measured fetch when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrumentation {
    pub enabled: bool,
    /// Fetches slower than this are logged at warn level.
    pub slow_threshold: Duration,
}

impl Instrumentation {
    pub fn new(enabled: bool, slow_threshold: Duration) -> Self {
        Self {
            enabled,
            slow_threshold,
        }
    }

    /// Instrumentation that never logs.
    pub fn disabled() -> Self {
        Self::new(false, Duration::MAX)
    }

    /// Awaits `fut`, logging how long it took under `operation`.
    pub async fn measure<F: Future>(&self, operation: &str, fut: F) -> F::Output {
        if !self.enabled {
            return fut.await;
        }

        let started = Instant::now();
        let output = fut.await;
        let elapsed = started.elapsed();
        let duration_ms = elapsed.as_secs_f64() * 1000.0;

        if elapsed > self.slow_threshold {
            tracing::warn!(operation, duration_ms, "Slow fetch");
        } else {
            tracing::debug!(operation, duration_ms, "Fetch timing");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_measure_returns_output() {
        let instrumentation = Instrumentation::new(true, Duration::from_millis(100));

        let value = instrumentation.measure("jobs_list", async { 42 }).await;

        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_disabled_passes_through() {
        let value = Instrumentation::disabled()
            .measure("jobs_list", async { "ok" })
            .await;

        assert_eq!(value, "ok");
    }
}
