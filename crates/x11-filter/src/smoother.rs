//! Weighted smoother
//!
//! Pads a series by the edge policy, runs a local weighted average at every
//! original position (or fits an analytic family over the padded series),
//! then trims the padding. Output length always equals input length.

use crate::analytic;
use crate::padding::{pad, trim, EdgeMode, EdgePolicy};
use crate::traits::Smoother;
use crate::weights::{KernelSpec, WeightKey, Weights};
use std::sync::Arc;
use tracing::trace;
use x11_core::{
    map_columns, ComputationCache, ComputePrimitives, Result, StatisticalKernel, MISSING,
};

/// Cache of resolved filter weights, shared between smoothers
pub type WeightCache = ComputationCache<WeightKey, Weights>;

/// Valid weight mass below which a window is treated as empty
const MIN_VALID_MASS: f64 = 1e-12;

/// Kernel-driven smoother over a single series or independent columns
#[derive(Clone, Debug)]
pub struct WeightedSmoother<P: ComputePrimitives> {
    primitives: P,
    spec: KernelSpec,
    edge_mode: EdgeMode,
    half_width: Option<usize>,
    cache: Option<WeightCache>,
}

impl<P: ComputePrimitives> WeightedSmoother<P> {
    /// Create a smoother with mirror edges and the kernel's own half-width
    pub fn new(primitives: P, spec: KernelSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            primitives,
            spec,
            edge_mode: EdgeMode::Mirror,
            half_width: None,
            cache: None,
        })
    }

    /// Set the edge mode
    pub fn with_edge_mode(mut self, mode: EdgeMode) -> Self {
        self.edge_mode = mode;
        self
    }

    /// Override the padding half-width
    ///
    /// A half-width smaller than the kernel's reach leaves the outermost
    /// positions without a full window; those come back missing.
    pub fn with_half_width(mut self, half_width: usize) -> Self {
        self.half_width = Some(half_width);
        self
    }

    /// Resolve weights through a shared cache
    pub fn with_cache(mut self, cache: WeightCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn spec(&self) -> &KernelSpec {
        &self.spec
    }

    /// Resolved weights, or `None` for analytic families
    pub fn weights(&self) -> Result<Option<Arc<Weights>>> {
        if self.spec.is_analytic() {
            return Ok(None);
        }
        let resolve = |_: &WeightKey| -> Result<Weights> {
            self.spec.weights()?.ok_or_else(|| {
                x11_core::Error::InvalidParameter(format!("{} has no weight vector", self.spec))
            })
        };
        let weights = match &self.cache {
            Some(cache) => cache.get_or_try_insert_with(&self.spec.key(), resolve)?,
            None => Arc::new(resolve(&self.spec.key())?),
        };
        Ok(Some(weights))
    }

    /// Edge policy actually applied
    pub fn edge_policy(&self) -> Result<EdgePolicy> {
        let half_width = match self.half_width {
            Some(h) => h,
            None => self.weights()?.map_or(0, |w| w.half_width()),
        };
        Ok(EdgePolicy::new(self.edge_mode, half_width))
    }

    /// Smooth one series
    pub fn smooth(&self, series: &[f64]) -> Result<Vec<f64>> {
        if series.is_empty() {
            return Ok(Vec::new());
        }
        let policy = self.edge_policy()?;
        let padded = pad(series, policy)?;
        trace!(spec = %self.spec, n = series.len(), half_width = policy.half_width, "smoothing");

        match self.weights()? {
            None => {
                let fitted = analytic::fit(&self.primitives, &self.spec, &padded)?;
                Ok(trim(&fitted, policy.half_width))
            }
            Some(weights) => Ok(self.convolve(&padded, series.len(), policy.half_width, &weights)),
        }
    }

    /// Smooth independent columns, in parallel with the `parallel` feature
    pub fn smooth_columns(&self, columns: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        map_columns(columns, |column| self.smooth(column))
    }

    fn convolve(&self, padded: &[f64], n: usize, h: usize, weights: &Weights) -> Vec<f64> {
        let left = weights.left_reach();
        let right = weights.right_reach();
        (0..n)
            .map(|i| {
                let j = i + h;
                if j < left || j + right >= padded.len() {
                    return MISSING;
                }
                let window = &padded[j - left..=j + right];
                let (sum, mass, any_missing) =
                    self.primitives.masked_weighted_sum(window, weights.values());
                if !any_missing {
                    sum
                } else if mass.abs() > MIN_VALID_MASS {
                    sum / mass
                } else {
                    MISSING
                }
            })
            .collect()
    }
}

impl<P: ComputePrimitives> StatisticalKernel for WeightedSmoother<P> {
    type Primitives = P;

    fn primitives(&self) -> &Self::Primitives {
        &self.primitives
    }

    fn name(&self) -> &'static str {
        "WeightedSmoother"
    }
}

impl<P: ComputePrimitives> Smoother for WeightedSmoother<P> {
    fn smooth(&self, series: &[f64]) -> Result<Vec<f64>> {
        WeightedSmoother::smooth(self, series)
    }

    fn describe(&self) -> String {
        format!("{} ({:?} edges)", self.spec, self.edge_mode)
    }

    fn reach(&self) -> Result<usize> {
        Ok(self.edge_policy()?.half_width)
    }
}
