use crate::error::{FilterError, Result};
use crate::hash::{optimal_bit_count, optimal_hash_count};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Derived bit-vector geometry: vector length and number of hash
/// derivations. Computed once at construction and never implicitly
/// recomputed, so offset derivation stays consistent for a filter's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    pub bits: u64,
    pub hash_count: u32,
}

impl FilterParams {
    /// Optimal parameters for `capacity` expected elements at the target
    /// false positive rate.
    pub fn calculate(capacity: usize, false_positive_rate: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(FilterError::InvalidArgument(
                "Capacity must be > 0".into(),
            ));
        }
        if false_positive_rate <= 0.0 || false_positive_rate >= 1.0 {
            return Err(FilterError::InvalidArgument(format!(
                "False positive rate must be between 0 and 1, got {false_positive_rate}"
            )));
        }

        let bits = optimal_bit_count(capacity, false_positive_rate);
        let hash_count = optimal_hash_count(capacity, bits).max(1);
        Ok(Self { bits, hash_count })
    }

    pub fn explicit(bits: u64, hash_count: u32) -> Result<Self> {
        if bits == 0 {
            return Err(FilterError::InvalidArgument(
                "Bit vector size must be > 0".into(),
            ));
        }
        if hash_count == 0 {
            return Err(FilterError::InvalidArgument(
                "Hash count must be >= 1".into(),
            ));
        }
        Ok(Self { bits, hash_count })
    }
}

/// Configuration shared by single filters and rotating series.
///
/// Either set `capacity` together with `false_positive_rate` to derive the
/// geometry, or rely on the explicit `bits`/`hash_count`. When both capacity
/// and rate are present they take precedence over, and overwrite, the
/// explicit values.
#[derive(Clone, Debug, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Expected number of elements; paired with `false_positive_rate`
    #[builder(default)]
    pub capacity: Option<usize>,

    /// Target false positive rate (0.0 to 1.0)
    #[builder(default)]
    pub false_positive_rate: Option<f64>,

    /// Explicit bit vector size, used when capacity/rate are not given
    #[builder(default = "85_001_024")]
    pub bits: u64,

    /// Explicit number of hash derivations
    #[builder(default = "2")]
    pub hash_count: u32,

    /// Fill ratio above which the filter counts as saturated
    #[builder(default = "0.75")]
    pub fill_max_ratio: f64,

    /// Bulk-add calls between saturation checks
    #[builder(default = "1000")]
    pub add_count_check: u64,

    /// Reset a saturated filter silently instead of failing
    #[builder(default = "true")]
    pub auto_reset: bool,

    /// Duration of one time bucket
    #[builder(default = "Duration::from_secs(60)")]
    pub resolution: Duration,

    /// Maximum bucket age considered current by default queries
    #[builder(default = "Duration::from_secs(600)")]
    pub retention_limit: Duration,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity.is_some() != self.false_positive_rate.is_some() {
            return Err(FilterError::InvalidArgument(
                "Capacity and false positive rate must be set together".into(),
            ));
        }
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Err(FilterError::InvalidArgument(
                    "Capacity must be > 0".into(),
                ));
            }
        }
        if let Some(rate) = self.false_positive_rate {
            if rate <= 0.0 || rate >= 1.0 {
                return Err(FilterError::InvalidArgument(format!(
                    "False positive rate must be between 0 and 1, got {rate}"
                )));
            }
        }
        if self.bits == 0 {
            return Err(FilterError::InvalidArgument(
                "Bit vector size must be > 0".into(),
            ));
        }
        if self.hash_count == 0 {
            return Err(FilterError::InvalidArgument(
                "Hash count must be >= 1".into(),
            ));
        }
        if self.fill_max_ratio <= 0.0 || self.fill_max_ratio > 1.0 {
            return Err(FilterError::InvalidArgument(format!(
                "Fill max ratio must be in (0, 1], got {}",
                self.fill_max_ratio
            )));
        }
        if self.resolution.is_zero() {
            return Err(FilterError::InvalidArgument(
                "Resolution must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Resolves the effective geometry, deriving from capacity/rate when
    /// both are present.
    pub fn params(&self) -> Result<FilterParams> {
        self.validate()?;
        match (self.capacity, self.false_positive_rate) {
            (Some(capacity), Some(rate)) => {
                FilterParams::calculate(capacity, rate)
            }
            _ => FilterParams::explicit(self.bits, self.hash_count),
        }
    }
}
