//! Parameter pool configuration.

use crate::error::ParamsError;

/// Configuration for drawing parameter pools.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Parameter sets per species count. Also the period of every index-table row.
    pub pool_size: usize,

    /// log10 bounds of the catalytic rates `k_cat`.
    pub rate_log_range: [f64; 2],

    /// log10 bounds of the thresholds `K_threshold`.
    pub threshold_log_range: [f64; 2],
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            pool_size: 10_000,
            rate_log_range: [-1.0, 1.0],
            threshold_log_range: [-3.0, 2.0],
        }
    }
}

impl SamplingConfig {
    /// Create a small config for testing.
    pub fn for_testing() -> Self {
        Self {
            pool_size: 64,
            ..Self::default()
        }
    }

    /// Builder pattern: set pool size.
    pub fn with_pool_size(mut self, n: usize) -> Self {
        self.pool_size = n;
        self
    }

    /// Builder pattern: set both log-space ranges.
    pub fn with_ranges(mut self, rate: [f64; 2], threshold: [f64; 2]) -> Self {
        self.rate_log_range = rate;
        self.threshold_log_range = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.pool_size == 0 || self.pool_size > u32::MAX as usize {
            return Err(ParamsError::InvalidPoolSize(self.pool_size));
        }
        for [lo, hi] in [self.rate_log_range, self.threshold_log_range] {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(ParamsError::InvalidRange { lo, hi });
            }
        }
        Ok(())
    }
}
