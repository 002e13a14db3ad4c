//! Adaptive rescaling of an unbounded noise signal into [0, 1]
//!
//! The window is the running min/max of every (spread) sample seen so far. It
//! only ever widens, so output settles once the noise has shown its range.

use std::collections::VecDeque;

/// Stretch applied before normalizing. Simplex noise clusters around zero;
/// 1.92 lines the output percentiles up roughly evenly.
pub const DEFAULT_SPREAD: f64 = 1.92;

/// Histogram resolution: normalized values are recorded in thousandths
const BUCKETS: usize = 1001;

pub struct NoiseNormalizer {
    spread: f64,
    min: f64,
    max: f64,
    histogram: Histogram,
}

impl NoiseNormalizer {
    pub fn new(spread: f64, histogram_window: usize) -> Self {
        Self {
            spread,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            histogram: Histogram::new(histogram_window),
        }
    }

    /// Normalizer sized for a display: keeps the last `pixels * 10_000` values
    pub fn for_pixels(pixels: usize) -> Self {
        Self::new(DEFAULT_SPREAD, pixels.saturating_mul(10_000))
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Fold `sample` into the window and return its position in [0, 1].
    /// Non-finite samples leave the window untouched and map to 0.
    pub fn normalize(&mut self, sample: f64) -> f64 {
        let spread = sample * self.spread;
        if !spread.is_finite() {
            return 0.0;
        }
        self.min = self.min.min(spread);
        self.max = self.max.max(spread);

        let range = self.max - self.min;
        let normalized = if range > 0.0 {
            ((spread.clamp(self.min, self.max) - self.min) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.histogram.record(normalized);
        normalized
    }
}

/// Bucket counts over a sliding window of recent values, for diagnostics only
pub struct Histogram {
    counts: Vec<u64>,
    window: VecDeque<u16>,
    capacity: usize,
}

impl Histogram {
    pub fn new(capacity: usize) -> Self {
        Self { counts: vec![0; BUCKETS], window: VecDeque::new(), capacity }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Record a value in [0, 1]; the oldest value is evicted once the window is full
    pub fn record(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        let bucket = (value.clamp(0.0, 1.0) * (BUCKETS - 1) as f64).round() as u16;
        if self.window.len() == self.capacity {
            if let Some(old) = self.window.pop_front() {
                self.counts[old as usize] -= 1;
            }
        }
        self.window.push_back(bucket);
        self.counts[bucket as usize] += 1;
    }

    /// Smallest recorded value `v` such that a fraction `p` of the window is <= `v`
    pub fn percentile(&self, p: f64) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        let rank = ((p.clamp(0.0, 1.0) * self.window.len() as f64).ceil() as u64).max(1);
        let mut seen = 0;
        for (bucket, &count) in self.counts.iter().enumerate() {
            seen += count;
            if seen >= rank {
                return Some(bucket as f64 / (BUCKETS - 1) as f64);
            }
        }
        None
    }

    pub fn summary(&self) -> Option<String> {
        let min = self.percentile(0.0)?;
        let max = self.percentile(1.0)?;
        let deciles: Vec<String> = (1..10)
            .filter_map(|d| self.percentile(d as f64 / 10.0).map(|v| format!("P{}: {:.3}", d * 10, v)))
            .collect();
        Some(format!("min: {:.3} {} max: {:.3}", min, deciles.join(" "), max))
    }
}
