//! In-memory statistics for the current form session.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Counters and latencies for predictions made in this session
pub struct SessionMetrics {
    /// Successful predictions
    pub predictions: AtomicU64,
    /// Failed predictions
    pub failures: AtomicU64,
    /// Latencies of successful predictions (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Last predicted value
    last_value: RwLock<Option<f64>>,
    /// Session start
    start_time: Instant,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            latencies: RwLock::new(Vec::new()),
            last_value: RwLock::new(None),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, latency: Duration, emissions_tonnes: f64) {
        self.predictions.fetch_add(1, Ordering::Relaxed);

        let mut latencies = self.latencies.write();
        latencies.push(latency.as_micros() as u64);
        // Keep only the most recent 1000
        if latencies.len() > 1000 {
            latencies.drain(0..500);
        }

        *self.last_value.write() = Some(emissions_tonnes);
    }

    /// Record a failed prediction
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Most recent successful prediction, if any
    pub fn last_value(&self) -> Option<f64> {
        *self.last_value.read()
    }

    /// Latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let latencies = self.latencies.read();
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = latencies.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let latency = self.get_latency_stats();

        info!(
            predictions = predictions,
            failures = failures,
            session_secs = self.start_time.elapsed().as_secs(),
            "Session summary"
        );
        if latency.count > 0 {
            info!(
                mean_us = latency.mean_us,
                p50_us = latency.p50_us,
                p95_us = latency.p95_us,
                max_us = latency.max_us,
                "Prediction latency"
            );
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}
