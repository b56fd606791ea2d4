//! Sliding-window sigma detector
//!
//! For every point the centred residual is mirror-padded by the half
//! bandwidth, and the mean and standard deviation of the `2h + 1` window
//! around the point are computed. The point's deviation from that band
//! drives a continuous dampening weight.

use crate::traits::{OutlierDetector, OutlierDetectorProperties};
use crate::types::{OutlierParameters, OutlierResult};
use tracing::debug;
use x11_core::{is_missing, validate_finite, ComputePrimitives, Result, StatisticalKernel};
use x11_filter::{pad, EdgePolicy};

/// Relative standard deviation below which a window counts as flat
const FLAT_WINDOW_TOLERANCE: f64 = 1e-10;

/// Local mean/sigma band detector
#[derive(Clone, Debug)]
pub struct SlidingWindowDetector<P: ComputePrimitives> {
    primitives: P,
    params: OutlierParameters,
}

impl<P: ComputePrimitives> SlidingWindowDetector<P> {
    /// Create a detector with default sigma limits (1.5, 2.5)
    pub fn new(primitives: P) -> Self {
        Self {
            primitives,
            params: OutlierParameters::default(),
        }
    }

    pub fn with_parameters(primitives: P, params: OutlierParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { primitives, params })
    }

    pub fn parameters(&self) -> &OutlierParameters {
        &self.params
    }

    /// Deviation of `value` from the non-missing part of `window`
    fn deviation(&self, value: f64, window: &mut Vec<f64>) -> f64 {
        window.retain(|v| !is_missing(*v));
        if window.is_empty() {
            return 0.0;
        }
        let mean = self.primitives.mean(window);
        let sd = self.primitives.population_variance(window).sqrt();
        let scale = self.primitives.mean_abs(window);
        if sd <= FLAT_WINDOW_TOLERANCE * (1.0 + scale) {
            0.0
        } else {
            (value - mean).abs() / sd
        }
    }
}

impl<P: ComputePrimitives> OutlierDetectorProperties for SlidingWindowDetector<P> {
    fn algorithm_name(&self) -> &'static str {
        "SlidingWindowSigma"
    }

    fn minimum_sample_size(&self) -> usize {
        1
    }
}

impl<P: ComputePrimitives> OutlierDetector for SlidingWindowDetector<P> {
    fn detect(&self, residual: &[f64], half_bandwidth: usize) -> Result<OutlierResult> {
        validate_finite(residual, "residual series")?;
        let n = residual.len();
        if n == 0 {
            return Ok(OutlierResult::trusted(0));
        }

        let h = half_bandwidth.min(n);
        let padded = pad(residual, EdgePolicy::mirror(h))?;
        let width = 2 * h + 1;

        let mut weights = Vec::with_capacity(n);
        let mut flags = Vec::with_capacity(n);
        let mut deviations = Vec::with_capacity(n);
        let mut window = Vec::with_capacity(width);

        for (i, &value) in residual.iter().enumerate() {
            if is_missing(value) {
                weights.push(1.0);
                flags.push(false);
                deviations.push(0.0);
                continue;
            }
            window.clear();
            window.extend_from_slice(&padded[i..i + width]);
            let d = self.deviation(value, &mut window);
            weights.push(self.params.weight(d));
            flags.push(self.params.is_extreme(d));
            deviations.push(d);
        }

        let result = OutlierResult {
            weights,
            flags,
            deviations,
            half_bandwidth: h,
        };
        debug!(
            n,
            half_bandwidth = h,
            flagged = result.flagged_count(),
            "sliding-window detection"
        );
        Ok(result)
    }
}

impl<P: ComputePrimitives> StatisticalKernel for SlidingWindowDetector<P> {
    type Primitives = P;

    fn primitives(&self) -> &Self::Primitives {
        &self.primitives
    }

    fn name(&self) -> &'static str {
        "SlidingWindowDetector"
    }
}
