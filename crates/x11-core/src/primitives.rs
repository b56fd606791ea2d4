//! Layer 1: compute primitives
//!
//! Low-level numeric operations shared by every smoother and detector. All
//! methods have scalar default implementations; a backend only needs to
//! name itself.

use crate::series::is_missing;

/// Primitive operations over `f64` slices
pub trait ComputePrimitives: Clone + Send + Sync {
    /// Get the name of this backend
    fn backend_name(&self) -> &'static str;

    /// Sum all elements in a slice
    fn sum(&self, data: &[f64]) -> f64 {
        data.iter().sum()
    }

    /// Compute dot product of two vectors
    fn dot_product(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "Vectors must have same length");
        a.iter().zip(b).map(|(&x, &y)| x * y).sum()
    }

    /// Compute mean of a slice
    fn mean(&self, data: &[f64]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        self.sum(data) / data.len() as f64
    }

    /// Population variance (divisor `n`)
    fn population_variance(&self, data: &[f64]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        let mean = self.mean(data);
        data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / data.len() as f64
    }

    /// Mean of absolute values
    fn mean_abs(&self, data: &[f64]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        data.iter().map(|x| x.abs()).sum::<f64>() / data.len() as f64
    }

    /// Weighted sum skipping missing values
    ///
    /// Returns `(sum, valid_mass, any_missing)` where `valid_mass` is the
    /// total weight attached to non-missing values.
    fn masked_weighted_sum(&self, data: &[f64], weights: &[f64]) -> (f64, f64, bool) {
        debug_assert_eq!(data.len(), weights.len(), "Window and weights must have same length");
        let mut sum = 0.0;
        let mut mass = 0.0;
        let mut any_missing = false;
        for (&v, &w) in data.iter().zip(weights) {
            if is_missing(v) {
                any_missing = true;
                continue;
            }
            sum += w * v;
            mass += w;
        }
        (sum, mass, any_missing)
    }
}

/// Portable scalar backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalarBackend;

impl ComputePrimitives for ScalarBackend {
    fn backend_name(&self) -> &'static str {
        "scalar"
    }
}

/// Create the scalar backend
pub fn scalar_backend() -> ScalarBackend {
    ScalarBackend
}
