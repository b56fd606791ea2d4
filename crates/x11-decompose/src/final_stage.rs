//! Stage E: un-adjusted estimate plus modified irregular and seasonally
//! adjusted series
//!
//! The un-adjusted estimate recombines the stage D trend and seasonal. Points that stage C found extreme in the irregular have their stage D
//! irregular shrunk toward neutral by stage C's weight, and the modified
//! seasonally adjusted value is rebuilt from the stage D trend. Every other
//! point is copied from stage D unchanged.

use crate::stage::StageOutput;
use x11_core::{Error, ResidualOp, Result};
use x11_outlier::OutlierResult;

/// Stage D series with stage C's extremes damped
#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedSeries {
    /// Stage D trend ⊗ seasonal
    pub unadjusted: Vec<f64>,
    pub irregular: Vec<f64>,
    pub seasonally_adjusted: Vec<f64>,
}

pub fn apply_final_dampening(
    stage_d: &StageOutput,
    extremes: &OutlierResult,
    op: ResidualOp,
) -> Result<ModifiedSeries> {
    let n = stage_d.irregular.len();
    if extremes.len() != n {
        return Err(Error::size_mismatch(n, extremes.len(), "stage C extreme weights"));
    }
    let neutral = op.neutral();
    let mut irregular = stage_d.irregular.clone();
    let mut seasonally_adjusted = stage_d.seasonally_adjusted.clone();

    for i in extremes.flagged_indices() {
        let damped = neutral + extremes.weights[i] * (stage_d.irregular[i] - neutral);
        irregular[i] = damped;
        seasonally_adjusted[i] = op.combine_value(stage_d.trend[i], damped);
    }

    Ok(ModifiedSeries {
        unadjusted: op.combine(&stage_d.trend, &stage_d.seasonal),
        irregular,
        seasonally_adjusted,
    })
}
