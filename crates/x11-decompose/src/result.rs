//! Decomposition results

use crate::stage::{StageDiagnostics, StageOutput};
use serde::{Deserialize, Serialize};
use std::fmt;
use x11_core::DecompositionMode;

/// Published components plus the per-stage record
///
/// Published series are in the units of the input, also for log-additive
/// runs; the stage outputs stay in the scale the pipeline worked in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct X11Result {
    pub mode: DecompositionMode,
    pub period: usize,
    /// Input with gaps filled
    pub original: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub seasonally_adjusted: Vec<f64>,
    pub irregular: Vec<f64>,
    /// Trend ⊗ seasonal, the series without its irregular
    pub unadjusted_estimate: Vec<f64>,
    pub modified_seasonally_adjusted: Vec<f64>,
    pub modified_irregular: Vec<f64>,
    /// Positions that were missing in the input and interpolated
    pub filled_indices: Vec<usize>,
    /// Stage C irregular weights that drive the final dampening
    pub extreme_weights: Vec<f64>,
    pub stage_b: StageOutput,
    pub stage_c: StageOutput,
    pub stage_d: StageOutput,
}

impl X11Result {
    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    pub fn diagnostics(&self) -> [&StageDiagnostics; 3] {
        [
            &self.stage_b.diagnostics,
            &self.stage_c.diagnostics,
            &self.stage_d.diagnostics,
        ]
    }

    /// Positions whose stage C irregular was flagged extreme
    pub fn extreme_indices(&self) -> Vec<usize> {
        self.stage_c.irregular_outliers.flagged_indices()
    }
}

impl fmt::Display for X11Result {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "X11Result {{ n: {}, period: {}, mode: {}, filled: {}, extremes: {} }}",
            self.len(),
            self.period,
            self.mode,
            self.filled_indices.len(),
            self.extreme_indices().len()
        )?;
        for diagnostics in self.diagnostics() {
            writeln!(f, "  {diagnostics}")?;
        }
        Ok(())
    }
}
