//! Replacement of flagged extremes
//!
//! Flagged points are not deleted. Each is pulled toward the local mean of
//! its own cycle position, computed with the flagged points masked out, in
//! proportion to how little weight the detector left it.

use crate::types::OutlierResult;
use x11_core::{is_missing, ComputePrimitives, Error, ResidualOp, Result};
use x11_filter::{EdgeMode, KernelSpec, SeasonalFilter};

/// Span of the period-wise average used as the replacement reference
const LOCAL_MEAN_SPAN: usize = 3;

/// New series with flagged values replaced by `w·v + (1 − w)·m`
///
/// A flagged value with weight 0 becomes the local mean `m` outright. Partial
/// weights blend the value toward it, and unflagged values are kept.
///
/// `m` is a 3-term moving average over the same cycle position with flagged
/// points masked. When no unflagged neighbour exists, `m` falls back to the
/// operator's neutral value.
pub fn substitute_extremes<P: ComputePrimitives>(
    primitives: &P,
    values: &[f64],
    result: &OutlierResult,
    period: usize,
    op: ResidualOp,
) -> Result<Vec<f64>> {
    if values.len() != result.len() {
        return Err(Error::size_mismatch(values.len(), result.len(), "outlier weights"));
    }
    if !result.has_extremes() {
        return Ok(values.to_vec());
    }

    let masked: Vec<f64> = values
        .iter()
        .zip(&result.flags)
        .map(|(&v, &flagged)| if flagged { f64::NAN } else { v })
        .collect();
    let local_mean = SeasonalFilter::new(
        primitives.clone(),
        KernelSpec::MovingAverage { span: LOCAL_MEAN_SPAN },
        period,
    )?
    .with_edge_mode(EdgeMode::Mirror)
    .filter(&masked)?;

    let neutral = op.neutral();
    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if !result.flags[i] {
                return v;
            }
            let m = if is_missing(local_mean[i]) { neutral } else { local_mean[i] };
            let w = result.weights[i];
            w * v + (1.0 - w) * m
        })
        .collect())
}
