//! Period splitter and joiner
//!
//! Element `i` of a series belongs to cycle position `i % p` and cycle
//! `i / p`. Splitting yields one column per position; a partial final cycle
//! is padded with the missing sentinel, never with made-up data.

use num_traits::Float;
use x11_core::{is_missing, Error, Result};

/// Position of `index` within a cycle of length `period`
#[inline]
pub fn cycle_position(index: usize, period: usize) -> usize {
    index % period
}

/// Number of cycles needed to cover `len` observations
#[inline]
pub fn cycle_count(len: usize, period: usize) -> usize {
    if period == 0 {
        0
    } else {
        len.div_ceil(period)
    }
}

/// Split `series` into `period` equal-length columns
pub fn split<T: Float>(series: &[T], period: usize) -> Result<Vec<Vec<T>>> {
    if period == 0 {
        return Err(Error::InvalidParameter("period must be positive".to_string()));
    }
    let rows = cycle_count(series.len(), period);
    Ok((0..period)
        .map(|c| {
            (0..rows)
                .map(|r| series.get(r * period + c).copied().unwrap_or_else(T::nan))
                .collect()
        })
        .collect())
}

/// Re-interleave columns into calendar order
///
/// With `target = None` the result stops at the last non-missing value;
/// otherwise it is truncated or padded with missing values to `target`.
pub fn join<T: Float>(columns: &[Vec<T>], target: Option<usize>) -> Vec<T> {
    let period = columns.len();
    if period == 0 {
        return target.map_or_else(Vec::new, |n| vec![T::nan(); n]);
    }
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    let total = target.unwrap_or(rows * period);

    let mut joined: Vec<T> = (0..total)
        .map(|i| {
            columns[cycle_position(i, period)]
                .get(i / period)
                .copied()
                .unwrap_or_else(T::nan)
        })
        .collect();

    if target.is_none() {
        while joined.last().is_some_and(|v| is_missing(*v)) {
            joined.pop();
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_pads_partial_cycle() {
        let cols = split(&[1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0], vec![1.0, 3.0, 5.0]);
        assert_eq!(cols[1][..2], [2.0, 4.0]);
        assert!(cols[1][2].is_nan());
    }

    #[test]
    fn test_join_drops_trailing_missing() {
        let cols = split(&[1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap();
        assert_eq!(join(&cols, None), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_join_to_target_length() {
        let cols = vec![vec![1.0, 3.0], vec![2.0, 4.0]];
        assert_eq!(join(&cols, Some(3)), vec![1.0, 2.0, 3.0]);
        let padded = join(&cols, Some(6));
        assert_eq!(padded[..4], [1.0, 2.0, 3.0, 4.0]);
        assert!(padded[4].is_nan() && padded[5].is_nan());
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(split(&[1.0f64], 0).is_err());
        assert_eq!(cycle_count(10, 0), 0);
        assert_eq!(cycle_count(25, 12), 3);
    }

    proptest! {
        #[test]
        fn split_then_join_round_trips(
            period in 1usize..13,
            cycles in 1usize..8,
            seed in prop::collection::vec(-1e6f64..1e6, 96),
        ) {
            let series: Vec<f64> = seed.iter().copied().cycle().take(period * cycles).collect();
            let cols = split(&series, period).unwrap();
            prop_assert_eq!(cols.len(), period);
            prop_assert_eq!(join(&cols, None), series.clone());
            prop_assert_eq!(join(&cols, Some(series.len())), series);
        }
    }
}
