//! Core traits for extreme value detection

use crate::types::OutlierResult;
use x11_core::Result;

/// Properties of a detector that don't depend on the data
pub trait OutlierDetectorProperties {
    /// Get the name of the detection algorithm
    fn algorithm_name(&self) -> &'static str;

    /// Get the minimum sample size required for detection
    fn minimum_sample_size(&self) -> usize;
}

/// Flags and downweights extreme points of a centred residual series
///
/// The residual is expected to be centred on zero (an irregular minus its
/// neutral value). Missing points are never flagged and keep weight 1.
pub trait OutlierDetector: OutlierDetectorProperties {
    fn detect(&self, residual: &[f64], half_bandwidth: usize) -> Result<OutlierResult>;
}
