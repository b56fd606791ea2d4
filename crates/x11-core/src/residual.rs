//! Residual operator and decomposition modes
//!
//! `normalize` expresses a series relative to a reference, as a difference
//! or a ratio, and `recombine` undoes it. Log-additive decompositions log the
//! data up front and then use plain differences.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How components combine into the observed series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DecompositionMode {
    /// data = trend + seasonal + irregular
    #[default]
    Additive,
    /// data = trend × seasonal × irregular
    Multiplicative,
    /// log(data) = trend + seasonal + irregular, reported back in levels
    LogAdditive,
}

impl DecompositionMode {
    /// Residual operator used inside the pipeline
    pub fn residual_op(&self) -> ResidualOp {
        match self {
            DecompositionMode::Multiplicative => ResidualOp::Ratio,
            DecompositionMode::Additive | DecompositionMode::LogAdditive => ResidualOp::Difference,
        }
    }

    /// Whether inputs must be strictly positive
    pub fn requires_positive(&self) -> bool {
        !matches!(self, DecompositionMode::Additive)
    }

    /// Whether input is logged before and exponentiated after decomposition
    pub fn uses_log(&self) -> bool {
        matches!(self, DecompositionMode::LogAdditive)
    }
}

impl fmt::Display for DecompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompositionMode::Additive => write!(f, "additive"),
            DecompositionMode::Multiplicative => write!(f, "multiplicative"),
            DecompositionMode::LogAdditive => write!(f, "log-additive"),
        }
    }
}

/// Difference or ratio residual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidualOp {
    Difference,
    Ratio,
}

impl ResidualOp {
    pub fn from_multiplicative(multiplicative: bool) -> Self {
        if multiplicative {
            ResidualOp::Ratio
        } else {
            ResidualOp::Difference
        }
    }

    pub fn is_multiplicative(&self) -> bool {
        matches!(self, ResidualOp::Ratio)
    }

    /// Identity element: 0 for differences, 1 for ratios
    #[inline]
    pub fn neutral(&self) -> f64 {
        match self {
            ResidualOp::Difference => 0.0,
            ResidualOp::Ratio => 1.0,
        }
    }

    #[inline]
    pub fn normalize_value(&self, a: f64, b: f64) -> f64 {
        match self {
            ResidualOp::Difference => a - b,
            ResidualOp::Ratio => a / b,
        }
    }

    #[inline]
    pub fn combine_value(&self, b: f64, r: f64) -> f64 {
        match self {
            ResidualOp::Difference => b + r,
            ResidualOp::Ratio => b * r,
        }
    }

    /// Element-wise `a ⊘ b`
    pub fn normalize(&self, a: &[f64], b: &[f64]) -> Vec<f64> {
        debug_assert_eq!(a.len(), b.len());
        a.iter().zip(b).map(|(&x, &y)| self.normalize_value(x, y)).collect()
    }

    /// Element-wise `b ⊗ r`
    pub fn combine(&self, b: &[f64], r: &[f64]) -> Vec<f64> {
        debug_assert_eq!(b.len(), r.len());
        b.iter().zip(r).map(|(&x, &y)| self.combine_value(x, y)).collect()
    }

    /// Residual shifted so the neutral value maps to zero
    pub fn centered(&self, residual: &[f64]) -> Vec<f64> {
        let neutral = self.neutral();
        residual.iter().map(|v| v - neutral).collect()
    }
}

/// `a - b`, or `a / b` when `multiplicative`
pub fn normalize(a: &[f64], b: &[f64], multiplicative: bool) -> Vec<f64> {
    ResidualOp::from_multiplicative(multiplicative).normalize(a, b)
}

/// Inverse of [`normalize`]: `b + r`, or `b * r` when `multiplicative`
pub fn recombine(b: &[f64], r: &[f64], multiplicative: bool) -> Vec<f64> {
    ResidualOp::from_multiplicative(multiplicative).combine(b, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_mode_properties() {
        assert_eq!(DecompositionMode::Additive.residual_op(), ResidualOp::Difference);
        assert_eq!(DecompositionMode::Multiplicative.residual_op(), ResidualOp::Ratio);
        assert_eq!(DecompositionMode::LogAdditive.residual_op(), ResidualOp::Difference);
        assert!(!DecompositionMode::Additive.requires_positive());
        assert!(DecompositionMode::LogAdditive.requires_positive());
        assert!(DecompositionMode::LogAdditive.uses_log());
        assert_eq!(DecompositionMode::Multiplicative.to_string(), "multiplicative");
    }

    #[test]
    fn test_normalize_difference_and_ratio() {
        assert_eq!(normalize(&[5.0, 3.0], &[2.0, 1.0], false), vec![3.0, 2.0]);
        assert_eq!(normalize(&[6.0, 3.0], &[2.0, 1.5], true), vec![3.0, 2.0]);
        assert_eq!(ResidualOp::Ratio.neutral(), 1.0);
        assert_eq!(ResidualOp::Difference.centered(&[1.0, -1.0]), vec![1.0, -1.0]);
        assert_eq!(ResidualOp::Ratio.centered(&[1.5]), vec![0.5]);
    }

    proptest! {
        #[test]
        fn normalize_then_recombine_is_identity(
            pairs in prop::collection::vec((-1e3f64..1e3, 0.01f64..1e3), 1..50),
            multiplicative in any::<bool>(),
        ) {
            let a: Vec<f64> = pairs.iter().map(|p| if multiplicative { p.0.abs() + 0.01 } else { p.0 }).collect();
            let b: Vec<f64> = pairs.iter().map(|p| p.1).collect();
            let r = normalize(&a, &b, multiplicative);
            let back = recombine(&b, &r, multiplicative);
            for (x, y) in a.iter().zip(&back) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9, max_relative = 1e-12);
            }
        }
    }
}
