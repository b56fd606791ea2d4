//! Small numeric helpers shared across crates

use crate::Result;

/// Smallest odd integer not below `x` (at least 1)
pub fn odd_up(x: f64) -> usize {
    let c = x.ceil().max(1.0) as usize;
    if c % 2 == 1 {
        c
    } else {
        c + 1
    }
}

/// Largest odd integer not above `x` (at least 1)
pub fn odd_down(x: f64) -> usize {
    let f = x.floor().max(1.0) as usize;
    if f % 2 == 1 {
        f
    } else {
        f - 1
    }
}

/// `|x| <= tol * (1 + |scale|)`
#[inline]
pub fn approx_zero(x: f64, scale: f64, tol: f64) -> bool {
    x.abs() <= tol * (1.0 + scale.abs())
}

/// Apply `f` to every column, in parallel when the `parallel` feature is on
///
/// Columns are independent; the output order matches the input order.
pub fn map_columns<C, R, F>(columns: &[C], f: F) -> Result<Vec<R>>
where
    C: Sync,
    R: Send,
    F: Fn(&C) -> Result<R> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        columns.par_iter().map(&f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        columns.iter().map(&f).collect()
    }
}
