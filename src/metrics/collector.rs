use crate::metrics::snapshot::MetricsSnapshot;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// Fetch counters shared by every request an analysis makes.
#[derive(Clone)]
pub struct MetricsCollector {
    pages_requested: Arc<AtomicU64>,
    pages_fetched: Arc<AtomicU64>,
    pages_failed: Arc<AtomicU64>,
    total_response_time_ms: Arc<AtomicU64>,
    start_time: Arc<Instant>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            pages_requested: Arc::new(AtomicU64::new(0)),
            pages_fetched: Arc::new(AtomicU64::new(0)),
            pages_failed: Arc::new(AtomicU64::new(0)),
            total_response_time_ms: Arc::new(AtomicU64::new(0)),
            start_time: Arc::new(Instant::now()),
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, duration: Duration) {
        self.pages_requested.fetch_add(1, Ordering::SeqCst);
        self.pages_fetched.fetch_add(1, Ordering::SeqCst);
        self.total_response_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn record_failure(&self, duration: Duration) {
        self.pages_requested.fetch_add(1, Ordering::SeqCst);
        self.pages_failed.fetch_add(1, Ordering::SeqCst);
        self.total_response_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requested = self.pages_requested.load(Ordering::SeqCst);
        let fetched = self.pages_fetched.load(Ordering::SeqCst);
        let total_time = self.total_response_time_ms.load(Ordering::SeqCst);

        let success_rate = if requested > 0 {
            (fetched as f64 / requested as f64) * 100.0
        } else {
            0.0
        };

        let avg_response_time_ms = if requested > 0 {
            total_time / requested
        } else {
            0
        };

        MetricsSnapshot {
            pages_requested: requested,
            pages_fetched: fetched,
            pages_failed: self.pages_failed.load(Ordering::SeqCst),
            success_rate,
            avg_response_time_ms,
            elapsed_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }
}
