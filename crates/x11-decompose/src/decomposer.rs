//! The X-11 decomposer: stages B, C, D and E

use crate::config::X11Config;
use crate::final_stage::apply_final_dampening;
use crate::result::X11Result;
use crate::stage::{run_stage, StageContext, StageKind};
use tracing::{debug, instrument};
use x11_core::{
    interpolate_missing, is_missing, map_columns, validate_finite, ComputePrimitives, Error,
    Result, ScalarBackend, StatisticalKernel,
};
use x11_filter::WeightCache;

/// Seasonal decomposition engine
///
/// Holds a validated configuration and a weight cache that is reused
/// across every call, including the series of [`decompose_many`].
///
/// [`decompose_many`]: X11Decomposer::decompose_many
#[derive(Debug, Clone)]
pub struct X11Decomposer<P: ComputePrimitives = ScalarBackend> {
    primitives: P,
    config: X11Config,
    cache: WeightCache,
}

impl X11Decomposer<ScalarBackend> {
    pub fn new(config: X11Config) -> Result<Self> {
        Self::with_primitives(ScalarBackend, config)
    }
}

impl<P: ComputePrimitives> X11Decomposer<P> {
    pub fn with_primitives(primitives: P, config: X11Config) -> Result<Self> {
        config.validate()?;
        let cache = WeightCache::new(config.cache_policy.clone());
        Ok(Self {
            primitives,
            config,
            cache,
        })
    }

    /// Share an existing weight cache instead of the private one
    pub fn with_cache(mut self, cache: WeightCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &X11Config {
        &self.config
    }

    pub fn cache(&self) -> &WeightCache {
        &self.cache
    }

    /// Decompose one series
    ///
    /// Fails before any filtering when the series is shorter than two
    /// cycles, contains infinities, has no observed value, or is not
    /// strictly positive under a multiplicative or log-additive mode.
    /// Missing values (NaN) are interpolated and reported.
    #[instrument(skip(self, data), fields(n = data.len(), period = self.config.period, mode = %self.config.mode))]
    pub fn decompose(&self, data: &[f64]) -> Result<X11Result> {
        let (original, filled_indices) = self.prepare(data)?;
        let op = self.config.mode.residual_op();
        let working = if self.config.mode.uses_log() {
            original.iter().map(|v| v.ln()).collect()
        } else {
            original.clone()
        };

        let ctx = StageContext::new(&self.primitives, &self.config, &self.cache);
        let stage_b = run_stage(&ctx, &working, &working, StageKind::B)?;
        let stage_c = run_stage(&ctx, &working, &stage_b.corrected, StageKind::C)?;
        let stage_d = run_stage(&ctx, &working, &stage_c.corrected, StageKind::D)?;
        let modified = apply_final_dampening(&stage_d, &stage_c.irregular_outliers, op)?;

        let publish = |series: &[f64]| -> Vec<f64> {
            if self.config.mode.uses_log() {
                series.iter().map(|v| v.exp()).collect()
            } else {
                series.to_vec()
            }
        };
        let result = X11Result {
            mode: self.config.mode,
            period: self.config.period,
            trend: publish(&stage_d.trend),
            seasonal: publish(&stage_d.seasonal),
            seasonally_adjusted: publish(&stage_d.seasonally_adjusted),
            irregular: publish(&stage_d.irregular),
            unadjusted_estimate: publish(&modified.unadjusted),
            modified_seasonally_adjusted: publish(&modified.seasonally_adjusted),
            modified_irregular: publish(&modified.irregular),
            original,
            filled_indices,
            extreme_weights: stage_c.irregular_outliers.weights.clone(),
            stage_b,
            stage_c,
            stage_d,
        };

        let cache = self.cache.stats();
        debug!(
            extremes = result.extreme_indices().len(),
            cache_hits = cache.hits,
            cache_misses = cache.misses,
            "decomposition complete"
        );
        Ok(result)
    }

    /// Decompose independent series, in parallel with the `parallel` feature
    ///
    /// The first failing series aborts the whole batch.
    #[instrument(skip(self, series), fields(count = series.len(), period = self.config.period))]
    pub fn decompose_many(&self, series: &[Vec<f64>]) -> Result<Vec<X11Result>> {
        map_columns(series, |data| self.decompose(data))
    }

    /// Validate the input and fill its gaps
    fn prepare(&self, data: &[f64]) -> Result<(Vec<f64>, Vec<usize>)> {
        let period = self.config.period;
        let n = data.len();
        if n < 2 * period {
            return Err(Error::InsufficientData {
                expected: 2 * period,
                actual: n,
            });
        }
        validate_finite(data, "input series")?;
        if self.config.mode.requires_positive() {
            if let Some((index, &value)) = data
                .iter()
                .enumerate()
                .find(|(_, v)| !is_missing(**v) && **v <= 0.0)
            {
                return Err(Error::NonPositiveData { index, value });
            }
        }
        self.config.validate_for_length(n)?;

        let (filled, filled_indices) = interpolate_missing(data)?;
        if !filled_indices.is_empty() {
            debug!(filled = filled_indices.len(), "interpolated missing values");
        }
        Ok((filled, filled_indices))
    }
}

impl<P: ComputePrimitives> StatisticalKernel for X11Decomposer<P> {
    type Primitives = P;

    fn primitives(&self) -> &Self::Primitives {
        &self.primitives
    }

    fn name(&self) -> &'static str {
        "X11Decomposer"
    }
}
