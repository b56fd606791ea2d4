//! One refinement stage (B, C or D)
//!
//! A stage turns a working series into a trend, a seasonal and an
//! irregular, detecting extremes twice on the way:
//!
//! 1. initial trend by a centred MA of the period, SI = working ⊘ trend
//! 2. first seasonal pass (3×3), centred by a centred MA; extremes of the
//!    SI residual are detected and pulled toward their local mean
//! 3. second seasonal pass (3×5, or chosen by the MSR in stage D)
//! 4. seasonally adjusted = original ⊘ seasonal
//! 5. Henderson trend of working ⊘ seasonal, its span chosen by the I/C
//!    ratio, so earlier corrections keep extremes out of the trend
//! 6. irregular = SA ⊘ trend; extremes detected and substituted
//! 7. corrected series = trend ⊗ seasonal ⊗ corrected irregular, the
//!    working series of the next stage

use crate::config::X11Config;
use crate::spans::{
    ic_ratio, moving_seasonality_ratio, select_henderson, select_seasonal, HendersonRegime,
    SeasonalSpan,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use x11_core::{ComputePrimitives, Error, ResidualOp, Result};
use x11_filter::{EdgeMode, KernelSpec, SeasonalFilter, WeightCache, WeightedSmoother};
use x11_outlier::{substitute_extremes, OutlierDetector, OutlierResult, SlidingWindowDetector};

/// Refinement stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    B,
    C,
    D,
}

impl StageKind {
    /// Stage B never picks the long Henderson filter
    pub fn allows_long_henderson(&self) -> bool {
        !matches!(self, StageKind::B)
    }

    /// Only stage D picks its seasonal span from the data
    pub fn selects_seasonal_span(&self) -> bool {
        matches!(self, StageKind::D)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::B => write!(f, "B"),
            StageKind::C => write!(f, "C"),
            StageKind::D => write!(f, "D"),
        }
    }
}

/// Choices a stage made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDiagnostics {
    pub kind: StageKind,
    /// I/C ratio of the trial Henderson fit
    pub ic_ratio: f64,
    pub henderson_span: usize,
    /// `None` when the span was fixed by configuration
    pub henderson_regime: Option<HendersonRegime>,
    /// Moving seasonality ratio, stage D only
    pub msr: Option<f64>,
    pub seasonal_span: SeasonalSpan,
    pub si_extremes: usize,
    pub irregular_extremes: usize,
}

impl fmt::Display for StageDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stage {}: I/C {:.3}, henderson {}, seasonal {}",
            self.kind, self.ic_ratio, self.henderson_span, self.seasonal_span
        )?;
        if let Some(msr) = self.msr {
            write!(f, ", MSR {msr:.3}")?;
        }
        write!(
            f,
            ", extremes {} SI / {} irregular",
            self.si_extremes, self.irregular_extremes
        )
    }
}

/// Everything one stage computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutput {
    pub initial_trend: Vec<f64>,
    pub si: Vec<f64>,
    /// SI after extreme substitution
    pub si_corrected: Vec<f64>,
    /// Uncentred output of the second seasonal pass
    pub raw_seasonal: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub seasonally_adjusted: Vec<f64>,
    pub trend: Vec<f64>,
    pub irregular: Vec<f64>,
    pub si_outliers: OutlierResult,
    pub irregular_outliers: OutlierResult,
    /// Input of the next stage
    pub corrected: Vec<f64>,
    pub diagnostics: StageDiagnostics,
}

/// Shared state of the stages of one run
#[derive(Debug, Clone)]
pub struct StageContext<'a, P: ComputePrimitives> {
    pub primitives: &'a P,
    pub config: &'a X11Config,
    pub cache: &'a WeightCache,
    pub op: ResidualOp,
}

impl<'a, P: ComputePrimitives> StageContext<'a, P> {
    pub fn new(primitives: &'a P, config: &'a X11Config, cache: &'a WeightCache) -> Self {
        Self {
            primitives,
            config,
            cache,
            op: config.mode.residual_op(),
        }
    }

    fn smoother(&self, spec: KernelSpec) -> Result<WeightedSmoother<P>> {
        Ok(WeightedSmoother::new(self.primitives.clone(), spec)?.with_cache(self.cache.clone()))
    }

    /// Centred moving average of one period
    fn centred_average(&self, series: &[f64], mode: EdgeMode) -> Result<Vec<f64>> {
        self.smoother(KernelSpec::CenteredMovingAverage {
            span: self.config.period,
        })?
        .with_edge_mode(mode)
        .smooth(series)
    }

    /// Seasonal factors: seasonal pass, then centred so a cycle sums to neutral
    fn seasonal_factors(&self, si: &[f64], span: SeasonalSpan) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut filter =
            SeasonalFilter::new(self.primitives.clone(), span.kernel(), self.config.period)?
                .with_cache(self.cache.clone());
        if let Some(h) = self.config.seasonal_half_width {
            filter = filter.with_half_width(h);
        }
        let raw = filter.filter(si)?;
        let level = self.centred_average(&raw, EdgeMode::Extend)?;
        let seasonal = self.op.normalize(&raw, &level);
        Ok((raw, seasonal))
    }

    fn henderson(&self, series: &[f64], span: usize) -> Result<Vec<f64>> {
        let mut smoother = self.smoother(KernelSpec::Henderson { span })?;
        if let Some(h) = self.config.trend_half_width {
            smoother = smoother.with_half_width(h);
        }
        smoother.smooth(series)
    }

    /// Extremes of a residual, measured around the neutral value
    fn detect(&self, residual: &[f64]) -> Result<OutlierResult> {
        SlidingWindowDetector::with_parameters(self.primitives.clone(), self.config.outlier)?
            .detect(&self.op.centered(residual), self.config.outlier_half_bandwidth())
    }

    fn substitute(&self, values: &[f64], result: &OutlierResult) -> Result<Vec<f64>> {
        substitute_extremes(self.primitives, values, result, self.config.period, self.op)
    }

    /// Span of the second seasonal pass and the MSR behind it, if any
    fn second_pass_span(
        &self,
        kind: StageKind,
        si: &[f64],
        years: usize,
    ) -> Result<(SeasonalSpan, Option<f64>)> {
        if let Some(span) = self.config.seasonal_span {
            if span.half_width() > years {
                return Err(Error::span_too_long(span.half_width(), years));
            }
            return Ok((span, None));
        }
        if kind.selects_seasonal_span() {
            let msr = moving_seasonality_ratio(self.primitives, si, self.config.period, self.op)?;
            Ok((select_seasonal(msr).fit_to_years(years)?, Some(msr)))
        } else {
            Ok((SeasonalSpan::S3x5.fit_to_years(years)?, None))
        }
    }
}

/// Run one refinement stage
///
/// `original` is the (possibly logged) input, `working` the series this
/// stage refines: the input itself for stage B, the previous stage's
/// corrected series afterwards.
pub fn run_stage<P: ComputePrimitives>(
    ctx: &StageContext<'_, P>,
    original: &[f64],
    working: &[f64],
    kind: StageKind,
) -> Result<StageOutput> {
    if original.len() != working.len() {
        return Err(Error::size_mismatch(original.len(), working.len(), "working series"));
    }
    let op = ctx.op;
    let period = ctx.config.period;
    let years = original.len() / period;

    let initial_trend = ctx.centred_average(working, EdgeMode::Mirror)?;
    let si = op.normalize(working, &initial_trend);

    let (_, first_seasonal) = ctx.seasonal_factors(&si, SeasonalSpan::S3x3.fit_to_years(years)?)?;
    let si_outliers = ctx.detect(&op.normalize(&si, &first_seasonal))?;
    let si_corrected = ctx.substitute(&si, &si_outliers)?;

    let (seasonal_span, msr) = ctx.second_pass_span(kind, &si_corrected, years)?;
    let (raw_seasonal, seasonal) = ctx.seasonal_factors(&si_corrected, seasonal_span)?;
    let seasonally_adjusted = op.normalize(original, &seasonal);
    let adjusted_working = op.normalize(working, &seasonal);

    let trial_span = HendersonRegime::Default.span(period);
    let trial = ctx.henderson(&adjusted_working, trial_span)?;
    let ic = ic_ratio(
        ctx.primitives,
        &trial,
        &op.normalize(&adjusted_working, &trial),
        period,
        op,
    );
    let (henderson_span, henderson_regime) = match ctx.config.henderson_span {
        Some(span) => (span, None),
        None => {
            let regime = select_henderson(ic, kind);
            (regime.span(period), Some(regime))
        }
    };
    let trend = if henderson_span == trial_span {
        trial
    } else {
        ctx.henderson(&adjusted_working, henderson_span)?
    };

    let irregular = op.normalize(&seasonally_adjusted, &trend);
    let irregular_outliers = ctx.detect(&irregular)?;
    let irregular_corrected = ctx.substitute(&irregular, &irregular_outliers)?;
    let corrected = op.combine(&op.combine(&trend, &seasonal), &irregular_corrected);

    let diagnostics = StageDiagnostics {
        kind,
        ic_ratio: ic,
        henderson_span,
        henderson_regime,
        msr,
        seasonal_span,
        si_extremes: si_outliers.flagged_count(),
        irregular_extremes: irregular_outliers.flagged_count(),
    };
    debug!(
        stage = %kind,
        ic_ratio = ic,
        henderson_span,
        msr = ?msr,
        seasonal_span = %seasonal_span,
        si_extremes = diagnostics.si_extremes,
        irregular_extremes = diagnostics.irregular_extremes,
        "stage complete"
    );

    Ok(StageOutput {
        initial_trend,
        si,
        si_corrected,
        raw_seasonal,
        seasonal,
        seasonally_adjusted,
        trend,
        irregular,
        si_outliers,
        irregular_outliers,
        corrected,
        diagnostics,
    })
}
