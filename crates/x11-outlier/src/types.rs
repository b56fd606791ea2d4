//! Types used for extreme value detection

use serde::{Deserialize, Serialize};
use std::fmt;
use x11_core::{Error, Result};

/// Sigma limits and window size of the sliding-window detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierParameters {
    /// Half-width of the detection window; `None` uses 2.5 × period
    pub half_bandwidth: Option<usize>,
    /// Deviations above this are flagged and start losing weight
    pub lower_sigma: f64,
    /// Deviations at or above this get zero weight
    pub upper_sigma: f64,
}

impl Default for OutlierParameters {
    fn default() -> Self {
        Self {
            half_bandwidth: None,
            lower_sigma: 1.5,
            upper_sigma: 2.5,
        }
    }
}

impl OutlierParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.lower_sigma > 0.0 && self.lower_sigma < self.upper_sigma)
            || !self.upper_sigma.is_finite()
        {
            return Err(Error::InvalidParameter(format!(
                "sigma limits must satisfy 0 < lower < upper, got {} and {}",
                self.lower_sigma, self.upper_sigma
            )));
        }
        if self.half_bandwidth == Some(0) {
            return Err(Error::InvalidParameter(
                "outlier half-bandwidth must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Window half-width for a given period
    pub fn resolve_half_bandwidth(&self, period: usize) -> usize {
        self.half_bandwidth
            .unwrap_or_else(|| ((2.5 * period as f64).round() as usize).max(1))
    }

    /// Linear ramp from 1 at `lower_sigma` to 0 at `upper_sigma`
    #[inline]
    pub fn weight(&self, deviation: f64) -> f64 {
        ((self.upper_sigma - deviation) / (self.upper_sigma - self.lower_sigma)).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_extreme(&self, deviation: f64) -> bool {
        deviation > self.lower_sigma
    }
}

/// Per-point outcome of the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierResult {
    /// Dampening weight in [0, 1]; 1 = fully trusted
    pub weights: Vec<f64>,
    /// Points whose deviation exceeds the lower sigma limit
    pub flags: Vec<bool>,
    /// `|value - local mean| / local sd`
    pub deviations: Vec<f64>,
    /// Window half-width actually used
    pub half_bandwidth: usize,
}

impl OutlierResult {
    /// All points trusted
    pub fn trusted(len: usize) -> Self {
        Self {
            weights: vec![1.0; len],
            flags: vec![false; len],
            deviations: vec![0.0; len],
            half_bandwidth: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn flagged_indices(&self) -> Vec<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, &f)| f)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn flagged_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn has_extremes(&self) -> bool {
        self.flags.iter().any(|&f| f)
    }
}

impl fmt::Display for OutlierResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OutlierResult {{ n: {}, flagged: {}, half_bandwidth: {} }}",
            self.len(),
            self.flagged_count(),
            self.half_bandwidth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weight_ramp() {
        let p = OutlierParameters::default();
        assert_eq!(p.weight(0.0), 1.0);
        assert_eq!(p.weight(1.5), 1.0);
        assert!((p.weight(2.0) - 0.5).abs() < 1e-12);
        assert_eq!(p.weight(2.5), 0.0);
        assert_eq!(p.weight(10.0), 0.0);
        assert!(!p.is_extreme(1.5));
        assert!(p.is_extreme(1.5001));
    }

    #[test]
    fn test_resolve_half_bandwidth() {
        let p = OutlierParameters::default();
        assert_eq!(p.resolve_half_bandwidth(12), 30);
        assert_eq!(p.resolve_half_bandwidth(4), 10);
        let p = OutlierParameters { half_bandwidth: Some(7), ..Default::default() };
        assert_eq!(p.resolve_half_bandwidth(12), 7);
    }

    #[test]
    fn test_validation() {
        assert!(OutlierParameters::default().validate().is_ok());
        let bad = OutlierParameters { lower_sigma: 3.0, upper_sigma: 2.0, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = OutlierParameters { half_bandwidth: Some(0), ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_result_accessors_and_display() {
        let mut r = OutlierResult::trusted(5);
        r.flags[3] = true;
        r.weights[3] = 0.2;
        r.half_bandwidth = 2;
        assert_eq!(r.flagged_indices(), vec![3]);
        assert_eq!(r.flagged_count(), 1);
        assert!(r.has_extremes());
        assert_eq!(
            r.to_string(),
            "OutlierResult { n: 5, flagged: 1, half_bandwidth: 2 }"
        );
    }
}
