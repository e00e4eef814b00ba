//! Runtime metrics for the screening service.

use crate::types::assessment::RiskLevel;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for screening throughput and outcomes
pub struct ScreeningMetrics {
    /// Total profiles screened successfully
    pub profiles_screened: AtomicU64,
    pub high_risk: AtomicU64,
    pub low_risk: AtomicU64,
    /// Requests rejected for invalid input or classifier output
    pub rejections: AtomicU64,
    /// Requests dropped because inference failed
    pub failures: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
    start_time: Instant,
}

impl ScreeningMetrics {
    pub fn new() -> Self {
        Self {
            profiles_screened: AtomicU64::new(0),
            high_risk: AtomicU64::new(0),
            low_risk: AtomicU64::new(0),
            rejections: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a successfully screened profile
    pub fn record_screening(&self, processing_time: Duration, level: RiskLevel, probability: f64) {
        self.profiles_screened.fetch_add(1, Ordering::Relaxed);
        match level {
            RiskLevel::High => self.high_risk.fetch_add(1, Ordering::Relaxed),
            RiskLevel::Low => self.low_risk.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (probability * 10.0).clamp(0.0, 9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let mut sorted: Vec<u64> = match self.processing_times.read() {
            Ok(times) => times.clone(),
            Err(_) => return ProcessingStats::default(),
        };
        if sorted.is_empty() {
            return ProcessingStats::default();
        }
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Profiles screened per second since startup
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.profiles_screened.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn get_probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or([0; 10])
    }

    /// Share of screened profiles classified as high risk, in percent
    pub fn high_risk_rate(&self) -> f64 {
        let screened = self.profiles_screened.load(Ordering::Relaxed);
        if screened == 0 {
            return 0.0;
        }
        self.high_risk.load(Ordering::Relaxed) as f64 / screened as f64 * 100.0
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let screened = self.profiles_screened.load(Ordering::Relaxed);
        let high = self.high_risk.load(Ordering::Relaxed);
        let low = self.low_risk.load(Ordering::Relaxed);
        let rejections = self.rejections.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();
        let distribution = self.get_probability_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║              RISK SCREENING - METRICS SUMMARY                ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Profiles Screened:  {:>8}  │  Throughput: {:>6.1} req/s    ║",
            screened,
            self.get_throughput()
        );
        info!(
            "║ High Risk: {:>8} ({:>5.1}%)  │  Low Risk: {:>8}          ║",
            high,
            self.high_risk_rate(),
            low
        );
        info!(
            "║ Rejected:  {:>8}            │  Failed:   {:>8}          ║",
            rejections, failures
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Risk Probability Distribution:                               ║");
        let total: u64 = distribution.iter().sum();
        for (i, &count) in distribution.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for ScreeningMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodically logs a metrics summary
pub struct MetricsReporter {
    metrics: Arc<ScreeningMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ScreeningMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs: interval_secs.max(1),
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = ScreeningMetrics::new();

        metrics.record_screening(Duration::from_micros(100), RiskLevel::High, 0.82);
        metrics.record_screening(Duration::from_micros(300), RiskLevel::Low, 0.05);
        metrics.record_rejection();

        assert_eq!(metrics.profiles_screened.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.high_risk.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.low_risk.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.rejections.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.high_risk_rate(), 50.0);

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 200);
        assert_eq!(stats.max_us, 300);
    }

    #[test]
    fn test_probability_buckets() {
        let metrics = ScreeningMetrics::new();

        metrics.record_screening(Duration::from_micros(10), RiskLevel::Low, 0.0);
        metrics.record_screening(Duration::from_micros(10), RiskLevel::High, 0.82);
        metrics.record_screening(Duration::from_micros(10), RiskLevel::High, 1.0);

        let distribution = metrics.get_probability_distribution();
        assert_eq!(distribution[0], 1);
        assert_eq!(distribution[8], 1);
        assert_eq!(distribution[9], 1);
    }

    #[test]
    fn test_empty_stats() {
        let metrics = ScreeningMetrics::new();
        assert_eq!(metrics.get_processing_stats().count, 0);
        assert_eq!(metrics.high_risk_rate(), 0.0);
    }
}
