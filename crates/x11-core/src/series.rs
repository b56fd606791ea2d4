//! Series model and missing-value handling
//!
//! A series is a plain slice of equally spaced observations. Missing
//! observations are encoded as NaN, so every smoother can carry them
//! through without a side mask.

use crate::{Error, Result};
use num_traits::Float;

/// Missing-value sentinel
pub const MISSING: f64 = f64::NAN;

/// Whether a value is the missing sentinel
#[inline]
pub fn is_missing<T: Float>(value: T) -> bool {
    value.is_nan()
}

/// Number of non-missing observations
pub fn count_present<T: Float>(series: &[T]) -> usize {
    series.iter().filter(|v| !is_missing(**v)).count()
}

/// Reject infinite values; NaN is allowed as the missing marker
pub fn validate_finite(series: &[f64], context: &str) -> Result<()> {
    match series.iter().position(|v| v.is_infinite()) {
        Some(index) => Err(Error::non_finite(context, index)),
        None => Ok(()),
    }
}

/// Fill missing observations
///
/// Interior gaps are linearly interpolated between the nearest observed
/// neighbours; leading and trailing gaps repeat the nearest observed value.
/// Returns the filled series and the indices that were filled.
pub fn interpolate_missing(series: &[f64]) -> Result<(Vec<f64>, Vec<usize>)> {
    let observed: Vec<usize> = series
        .iter()
        .enumerate()
        .filter(|(_, v)| !is_missing(**v))
        .map(|(i, _)| i)
        .collect();

    let (first, last) = match (observed.first(), observed.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => {
            return Err(Error::InvalidInput(
                "series contains no observed values".to_string(),
            ))
        }
    };

    let mut filled = series.to_vec();
    let mut filled_indices = Vec::new();

    for i in 0..first {
        filled[i] = series[first];
        filled_indices.push(i);
    }

    for pair in observed.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let span = (hi - lo) as f64;
        for i in lo + 1..hi {
            let t = (i - lo) as f64 / span;
            filled[i] = series[lo] + t * (series[hi] - series[lo]);
            filled_indices.push(i);
        }
    }

    for i in last + 1..series.len() {
        filled[i] = series[last];
        filled_indices.push(i);
    }

    Ok((filled, filled_indices))
}
