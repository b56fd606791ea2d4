//! Period-wise (seasonal) filter
//!
//! Smooths each calendar position across cycles independently: the series
//! is split into one column per position, every column is smoothed on its
//! own, and the columns are joined back in calendar order.

use crate::padding::EdgeMode;
use crate::period::{join, split};
use crate::smoother::{WeightCache, WeightedSmoother};
use crate::traits::Smoother;
use crate::weights::KernelSpec;
use tracing::trace;
use x11_core::{is_missing, map_columns, ComputePrimitives, Error, Result, StatisticalKernel, MISSING};

/// Weighted smoother applied per cycle position
#[derive(Clone, Debug)]
pub struct SeasonalFilter<P: ComputePrimitives> {
    smoother: WeightedSmoother<P>,
    period: usize,
}

impl<P: ComputePrimitives> SeasonalFilter<P> {
    pub fn new(primitives: P, spec: KernelSpec, period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::InvalidParameter("period must be positive".to_string()));
        }
        Ok(Self {
            smoother: WeightedSmoother::new(primitives, spec)?,
            period,
        })
    }

    /// Short `3 × k` composite, the usual seasonal moving average
    pub fn composite(primitives: P, spans: &[usize], period: usize) -> Result<Self> {
        Self::new(primitives, KernelSpec::Composite { spans: spans.to_vec() }, period)
    }

    pub fn with_edge_mode(mut self, mode: EdgeMode) -> Self {
        self.smoother = self.smoother.with_edge_mode(mode);
        self
    }

    pub fn with_half_width(mut self, half_width: usize) -> Self {
        self.smoother = self.smoother.with_half_width(half_width);
        self
    }

    pub fn with_cache(mut self, cache: WeightCache) -> Self {
        self.smoother = self.smoother.with_cache(cache);
        self
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn spec(&self) -> &KernelSpec {
        self.smoother.spec()
    }

    /// Smooth every cycle position of `series`
    ///
    /// Trailing missing values of a column (the unfilled part of a partial
    /// final cycle) are left out of its smoothing pass and restored after.
    pub fn filter(&self, series: &[f64]) -> Result<Vec<f64>> {
        let columns = split(series, self.period)?;
        trace!(period = self.period, spec = %self.smoother.spec(), "seasonal filter");
        let smoothed = map_columns(&columns, |column| {
            let observed = column
                .iter()
                .rposition(|v| !is_missing(*v))
                .map_or(0, |last| last + 1);
            let mut out = self.smoother.smooth(&column[..observed])?;
            out.resize(column.len(), MISSING);
            Ok(out)
        })?;
        Ok(join(&smoothed, Some(series.len())))
    }
}

impl<P: ComputePrimitives> StatisticalKernel for SeasonalFilter<P> {
    type Primitives = P;

    fn primitives(&self) -> &Self::Primitives {
        self.smoother.primitives()
    }

    fn name(&self) -> &'static str {
        "SeasonalFilter"
    }
}

impl<P: ComputePrimitives> Smoother for SeasonalFilter<P> {
    fn smooth(&self, series: &[f64]) -> Result<Vec<f64>> {
        self.filter(series)
    }

    fn describe(&self) -> String {
        format!("seasonal {} over period {}", self.smoother.spec(), self.period)
    }

    fn reach(&self) -> Result<usize> {
        self.smoother.reach()
    }
}
