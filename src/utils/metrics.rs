//! Observability and Metrics
//!
//! Counters for envelope traffic. A [`EnvelopeMetrics`] instance is attached
//! to a codec explicitly; there is no global collector.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for envelope operations
#[derive(Debug)]
pub struct EnvelopeMetrics {
    /// Envelopes successfully written
    pub envelopes_encoded: AtomicU64,
    /// Envelopes successfully read
    pub envelopes_decoded: AtomicU64,
    /// Total envelope bytes written
    pub bytes_encoded: AtomicU64,
    /// Total envelope bytes read
    pub bytes_decoded: AtomicU64,
    /// Total compression operations
    pub compression_total: AtomicU64,
    /// Successful compression operations
    pub compression_success: AtomicU64,
    /// Failed serializations
    pub encode_failures: AtomicU64,
    /// Rejected envelopes
    pub decode_failures: AtomicU64,
    /// Header-only version lookups
    pub version_extractions: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl EnvelopeMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            envelopes_encoded: AtomicU64::new(0),
            envelopes_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            compression_total: AtomicU64::new(0),
            compression_success: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            version_extractions: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record an envelope written
    pub fn envelope_encoded(&self, byte_count: u64) {
        self.envelopes_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record an envelope read
    pub fn envelope_decoded(&self, byte_count: u64) {
        self.envelopes_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a compression attempt
    pub fn compression_attempt(&self) {
        self.compression_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful compression
    pub fn compression_success(&self) {
        self.compression_success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn encode_failure(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn version_extracted(&self) {
        self.version_extractions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            envelopes_encoded: self.envelopes_encoded.load(Ordering::Relaxed),
            envelopes_decoded: self.envelopes_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            compression_total: self.compression_total.load(Ordering::Relaxed),
            compression_success: self.compression_success.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            version_extractions: self.version_extractions.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            envelopes_encoded = snapshot.envelopes_encoded,
            envelopes_decoded = snapshot.envelopes_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            compression_total = snapshot.compression_total,
            compression_success = snapshot.compression_success,
            encode_failures = snapshot.encode_failures,
            decode_failures = snapshot.decode_failures,
            version_extractions = snapshot.version_extractions,
            uptime_seconds = snapshot.uptime_seconds,
            "Envelope metrics snapshot"
        );
    }
}

impl Default for EnvelopeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub envelopes_encoded: u64,
    pub envelopes_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub compression_total: u64,
    pub compression_success: u64,
    pub encode_failures: u64,
    pub decode_failures: u64,
    pub version_extractions: u64,
    pub uptime_seconds: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = EnvelopeMetrics::new();
        metrics.envelope_encoded(100);
        metrics.envelope_encoded(50);
        metrics.envelope_decoded(100);
        metrics.compression_attempt();
        metrics.compression_success();
        metrics.decode_failure();
        metrics.version_extracted();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.envelopes_encoded, 2);
        assert_eq!(snapshot.bytes_encoded, 150);
        assert_eq!(snapshot.envelopes_decoded, 1);
        assert_eq!(snapshot.bytes_decoded, 100);
        assert_eq!(snapshot.compression_total, 1);
        assert_eq!(snapshot.compression_success, 1);
        assert_eq!(snapshot.encode_failures, 0);
        assert_eq!(snapshot.decode_failures, 1);
        assert_eq!(snapshot.version_extractions, 1);
    }

    #[test]
    fn test_counters_shared_across_threads() {
        let metrics = std::sync::Arc::new(EnvelopeMetrics::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.envelope_decoded(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().ok();
        }
        assert_eq!(metrics.snapshot().envelopes_decoded, 4000);
    }
}
