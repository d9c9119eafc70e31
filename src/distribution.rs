//! The distribution-summary collaborator boundary.
//!
//! Histogram measurements carry a streaming distribution object fed raw
//! `(value, weight)` samples by the plugin side. The accumulator only reads
//! the four aggregate statistics; sketch and bucketing internals stay behind
//! this trait.

/// Read-only view of a streaming distribution.
///
/// Implementations accumulate weighted samples elsewhere; the adapter never
/// mutates distribution state.
pub trait DistributionSummary: Send + Sync {
    /// Smallest observed value
    fn minimum(&self) -> f64;
    /// Largest observed value
    fn maximum(&self) -> f64;
    /// Weighted sum of observed values
    fn sum(&self) -> f64;
    /// Total observed weight
    fn sample_count(&self) -> f64;
}

/// Exact streaming min/max/sum/count distribution.
///
/// Reference implementation used by the harness and tests. Keeps no samples,
/// only the four statistics the adapter consumes. Entries with a non-finite
/// value or a non-positive weight are ignored.
#[derive(Debug, Clone, Default)]
pub struct StreamingDistribution {
    min: f64,
    max: f64,
    sum: f64,
    count: f64,
}

impl StreamingDistribution {
    /// Creates an empty distribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one weighted sample
    pub fn add_entry(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || !weight.is_finite() || weight <= 0.0 {
            return;
        }
        if self.count == 0.0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value * weight;
        self.count += weight;
    }

    /// Returns true if no samples have been recorded
    pub fn is_empty(&self) -> bool {
        self.count == 0.0
    }
}

impl DistributionSummary for StreamingDistribution {
    fn minimum(&self) -> f64 {
        self.min
    }

    fn maximum(&self) -> f64 {
        self.max
    }

    fn sum(&self) -> f64 {
        self.sum
    }

    fn sample_count(&self) -> f64 {
        self.count
    }
}
