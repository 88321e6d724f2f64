//! Request health metrics for the upstream API client
//!
//! Tracks a rolling window of request latencies and outcomes so each cycle
//! can report how the upstream is behaving.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples kept in the rolling window
const MAX_SAMPLES: usize = 100;

/// Snapshot of request health for a source
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    /// Name of the source
    pub source_name: String,
    /// Mean latency over the window in milliseconds
    pub mean_latency_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of requests tracked (lifetime)
    pub total_requests: u64,
    /// Number of failed requests (lifetime)
    pub failed_requests: u64,
}

impl RequestMetrics {
    /// Creates metrics with no data
    pub fn empty(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            mean_latency_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct Sample {
    duration_ms: f64,
    success: bool,
}

/// Collects request samples for one source
pub struct MetricsCollector {
    source_name: String,
    samples: Arc<RwLock<VecDeque<Sample>>>,
    total_requests: Arc<RwLock<u64>>,
    failed_requests: Arc<RwLock<u64>>,
}

impl MetricsCollector {
    /// Creates a new collector for a source
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            samples: Arc::new(RwLock::new(VecDeque::with_capacity(MAX_SAMPLES))),
            total_requests: Arc::new(RwLock::new(0)),
            failed_requests: Arc::new(RwLock::new(0)),
        }
    }

    /// Records a request with its duration and outcome
    pub async fn record_request(&self, duration: Duration, success: bool) {
        let duration_ms = duration.as_secs_f64() * 1000.0;

        {
            let mut total = self.total_requests.write().await;
            *total += 1;
        }

        if !success {
            let mut failed = self.failed_requests.write().await;
            *failed += 1;
        }

        let mut samples = self.samples.write().await;
        if samples.len() >= MAX_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(Sample {
            duration_ms,
            success,
        });
    }

    /// Computes current metrics from the collected samples
    pub async fn get_metrics(&self) -> RequestMetrics {
        let samples = self.samples.read().await;
        let total = *self.total_requests.read().await;
        let failed = *self.failed_requests.read().await;

        if samples.is_empty() {
            return RequestMetrics::empty(&self.source_name);
        }

        let successful: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();

        let mean_latency_ms = if successful.is_empty() {
            0.0
        } else {
            successful.iter().sum::<f64>() / successful.len() as f64
        };

        let success_rate = if total > 0 {
            (total - failed) as f64 / total as f64
        } else {
            1.0
        };

        RequestMetrics {
            source_name: self.source_name.clone(),
            mean_latency_ms,
            success_rate,
            total_requests: total,
            failed_requests: failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_collector() {
        let collector = MetricsCollector::new("test");

        collector
            .record_request(Duration::from_millis(100), true)
            .await;
        collector
            .record_request(Duration::from_millis(200), true)
            .await;
        collector
            .record_request(Duration::from_millis(150), false)
            .await;

        let metrics = collector.get_metrics().await;

        assert_eq!(metrics.source_name, "test");
        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.mean_latency_ms, 150.0);
        assert!(metrics.success_rate > 0.6 && metrics.success_rate < 0.7);
    }

    #[tokio::test]
    async fn empty_collector_reports_clean_slate() {
        let collector = MetricsCollector::new("test");
        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.success_rate, 1.0);
    }
}
