//! Adaptive filter-span selection
//!
//! Two rules pick filter lengths from the data:
//!
//! - the **I/C ratio** compares the average period-to-period movement of the
//!   irregular with that of the trend-cycle and picks a Henderson span;
//! - the **moving seasonality ratio** compares year-over-year noise in the
//!   SI values with the movement of their smoothed seasonal pattern and
//!   picks the seasonal moving average.
//!
//! Both rules are defined on ratios; a zero denominator resolves into the
//! nearest regime instead of failing.

use crate::stage::StageKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use x11_core::{
    approx_zero, is_missing, odd_down, odd_up, ComputePrimitives, Error, ResidualOp, Result,
};
use x11_filter::{split, KernelSpec, WeightedSmoother};

/// I/C ratio above which stages C and D use the long Henderson filter
pub const LONG_HENDERSON_THRESHOLD: f64 = 3.5;
/// I/C ratio above which the default Henderson filter is used
pub const DEFAULT_HENDERSON_THRESHOLD: f64 = 1.0;
/// MSR below which the 3×3 seasonal average is used
pub const SHORT_SEASONAL_THRESHOLD: f64 = 3.0;
/// MSR above which the 3×9 seasonal average is used
pub const LONG_SEASONAL_THRESHOLD: f64 = 6.0;

/// Henderson span regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HendersonRegime {
    /// About two thirds of the period, rounded up to odd
    Short,
    /// The period, rounded up to odd
    Default,
    /// About twice the period, rounded down to odd
    Long,
}

impl HendersonRegime {
    pub fn span(&self, period: usize) -> usize {
        let p = period as f64;
        match self {
            HendersonRegime::Short => odd_up(2.0 * p / 3.0),
            HendersonRegime::Default => odd_up(p),
            HendersonRegime::Long => odd_down(2.0 * p),
        }
    }
}

impl fmt::Display for HendersonRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HendersonRegime::Short => write!(f, "short"),
            HendersonRegime::Default => write!(f, "default"),
            HendersonRegime::Long => write!(f, "long"),
        }
    }
}

/// Henderson regime for an I/C ratio
///
/// Stage B only chooses between short and default; later stages may also
/// pick the long filter.
pub fn select_henderson(ratio: f64, kind: StageKind) -> HendersonRegime {
    if kind.allows_long_henderson() && ratio > LONG_HENDERSON_THRESHOLD {
        HendersonRegime::Long
    } else if ratio > DEFAULT_HENDERSON_THRESHOLD {
        HendersonRegime::Default
    } else {
        HendersonRegime::Short
    }
}

/// `|x_t - x_{t-1}|`, or `|x_t / x_{t-1} - 1|` for ratios
pub fn absolute_growth(series: &[f64], op: ResidualOp) -> Vec<f64> {
    series
        .windows(2)
        .map(|w| match op {
            ResidualOp::Difference => (w[1] - w[0]).abs(),
            ResidualOp::Ratio => (w[1] / w[0] - 1.0).abs(),
        })
        .collect()
}

/// `numerator / denominator` with a defined value for a vanishing denominator
///
/// 0/0 is 0 (no movement anywhere) and x/0 is +∞, which every selection
/// rule maps to its longest regime.
pub fn degenerate_ratio(numerator: f64, denominator: f64) -> f64 {
    if approx_zero(denominator, numerator, 1e-12) {
        if numerator.abs() <= 1e-12 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        numerator / denominator
    }
}

/// Average irregular movement over average trend movement
///
/// Measured on `[2p, n - p)` to keep the first two and the last cycle,
/// where the symmetric filters run on mirrored data, out of the ratio.
/// Falls back to the whole series when that window is too short.
pub fn ic_ratio<P: ComputePrimitives>(
    primitives: &P,
    trend: &[f64],
    irregular: &[f64],
    period: usize,
    op: ResidualOp,
) -> f64 {
    let n = trend.len().min(irregular.len());
    let (mut lo, mut hi) = (2 * period, n.saturating_sub(period));
    if hi < lo + 2 {
        lo = 0;
        hi = n;
    }
    if hi < lo + 2 {
        return 0.0;
    }
    let cbar = primitives.mean(&absolute_growth(&trend[lo..hi], op));
    let ibar = primitives.mean(&absolute_growth(&irregular[lo..hi], op));
    degenerate_ratio(ibar, cbar)
}

/// Seasonal moving-average span (`3 × k`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeasonalSpan {
    S3x1,
    S3x3,
    S3x5,
    S3x9,
    S3x15,
}

impl SeasonalSpan {
    /// Component spans of the composite average
    pub fn spans(&self) -> [usize; 2] {
        match self {
            SeasonalSpan::S3x1 => [3, 1],
            SeasonalSpan::S3x3 => [3, 3],
            SeasonalSpan::S3x5 => [3, 5],
            SeasonalSpan::S3x9 => [3, 9],
            SeasonalSpan::S3x15 => [3, 15],
        }
    }

    pub fn kernel(&self) -> KernelSpec {
        KernelSpec::Composite { spans: self.spans().to_vec() }
    }

    /// Cycles reached on each side of the centre
    pub fn half_width(&self) -> usize {
        let [a, b] = self.spans();
        (a + b - 2) / 2
    }

    /// Next shorter span, if any
    pub fn step_down(&self) -> Option<SeasonalSpan> {
        match self {
            SeasonalSpan::S3x1 => None,
            SeasonalSpan::S3x3 => Some(SeasonalSpan::S3x1),
            SeasonalSpan::S3x5 => Some(SeasonalSpan::S3x3),
            SeasonalSpan::S3x9 => Some(SeasonalSpan::S3x5),
            SeasonalSpan::S3x15 => Some(SeasonalSpan::S3x9),
        }
    }

    /// Shorten until the half-width fits in `years` complete cycles
    pub fn fit_to_years(self, years: usize) -> Result<SeasonalSpan> {
        let mut span = self;
        while span.half_width() > years {
            span = span
                .step_down()
                .ok_or_else(|| Error::span_too_long(span.half_width(), years))?;
        }
        Ok(span)
    }
}

impl fmt::Display for SeasonalSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.spans();
        write!(f, "{a}x{b}")
    }
}

/// Seasonal span for a moving seasonality ratio
pub fn select_seasonal(msr: f64) -> SeasonalSpan {
    if msr < SHORT_SEASONAL_THRESHOLD {
        SeasonalSpan::S3x3
    } else if msr <= LONG_SEASONAL_THRESHOLD {
        SeasonalSpan::S3x5
    } else {
        SeasonalSpan::S3x9
    }
}

/// Finite-sample corrections `(c_I, c_S)` for a column of `years` values
///
/// They rescale the average absolute change of the irregular and of the
/// 3×3-smoothed seasonal so that both match their long-sample expectation
/// under white noise. Short columns use precomputed constants.
pub fn finite_sample_corrections(years: usize) -> (f64, f64) {
    match years {
        0 | 1 => (1.0, 1.0),
        2 => (1.015504800579495, 1.7320508075688765),
        3 => (0.9925092578236596, 0.8660254037844386),
        4 => (0.9950121903401494, 0.9115785659111069),
        5 => (0.996240548370389, 0.9282032302755091),
        6 => (0.9969901756384909, 0.9417258044202231),
        _ => white_noise_corrections(years),
    }
}

/// Long-sample mean step norms of `I − M` and `M` for the 3×3 average
const IRREGULAR_STEP_NORM: f64 = 1.2765694770084056; // sqrt(132) / 9
const SEASONAL_STEP_NORM: f64 = 0.2721655269759087; // sqrt(6) / 9

/// Corrections from the exact mirror-padded 3×3 operator on `years` points
fn white_noise_corrections(years: usize) -> (f64, f64) {
    let smoothing = mirrored_composite_matrix(years);
    let irregular: Vec<Vec<f64>> = smoothing
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, &m)| if i == j { 1.0 - m } else { -m })
                .collect()
        })
        .collect();
    (
        IRREGULAR_STEP_NORM / mean_step_norm(&irregular),
        SEASONAL_STEP_NORM / mean_step_norm(&smoothing),
    )
}

/// Matrix of the 3×3 average with mirror padding (edge point repeated)
fn mirrored_composite_matrix(n: usize) -> Vec<Vec<f64>> {
    const WEIGHTS: [f64; 5] = [1.0 / 9.0, 2.0 / 9.0, 3.0 / 9.0, 2.0 / 9.0, 1.0 / 9.0];
    let k = 2usize;
    let source = |padded: usize| -> usize {
        if padded < k {
            k - 1 - padded
        } else if padded < k + n {
            padded - k
        } else {
            n - 1 - (padded - k - n)
        }
    };
    let mut matrix = vec![vec![0.0; n]; n];
    for (i, row) in matrix.iter_mut().enumerate() {
        for (o, &w) in WEIGHTS.iter().enumerate() {
            row[source(i + o)] += w;
        }
    }
    matrix
}

/// Mean Euclidean norm of successive row differences
fn mean_step_norm(matrix: &[Vec<f64>]) -> f64 {
    let steps: Vec<f64> = matrix
        .windows(2)
        .map(|rows| {
            rows[1]
                .iter()
                .zip(&rows[0])
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt()
        })
        .collect();
    steps.iter().sum::<f64>() / steps.len() as f64
}

/// Moving seasonality ratio of a (corrected) SI series
///
/// Per cycle position with at least three observations, the values are
/// smoothed with a mirrored 3×3 average into a seasonal `S`, and `I` is
/// their residual. Average absolute changes of both, corrected for the
/// column length, are averaged over positions and divided. With no usable
/// position the ratio is 0, which selects the shortest regular span.
pub fn moving_seasonality_ratio<P: ComputePrimitives>(
    primitives: &P,
    si: &[f64],
    period: usize,
    op: ResidualOp,
) -> Result<f64> {
    let smoother = WeightedSmoother::new(primitives.clone(), SeasonalSpan::S3x3.kernel())?;
    let mut ibars = Vec::with_capacity(period);
    let mut sbars = Vec::with_capacity(period);

    for column in split(si, period)? {
        let values: Vec<f64> = column.into_iter().filter(|v| !is_missing(*v)).collect();
        if values.len() < 3 {
            continue;
        }
        let seasonal = smoother.smooth(&values)?;
        let irregular = op.normalize(&values, &seasonal);
        let (ci, cs) = finite_sample_corrections(values.len());
        ibars.push(primitives.mean(&absolute_growth(&irregular, op)) * ci);
        sbars.push(primitives.mean(&absolute_growth(&seasonal, op)) * cs);
    }

    if ibars.is_empty() {
        return Ok(0.0);
    }
    Ok(degenerate_ratio(primitives.mean(&ibars), primitives.mean(&sbars)))
}
