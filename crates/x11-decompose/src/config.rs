//! Decomposition configuration

use crate::spans::{HendersonRegime, SeasonalSpan};
use serde::{Deserialize, Serialize};
use x11_core::{CachePolicy, DecompositionMode, Error, Result};
use x11_outlier::OutlierParameters;

/// Read-only settings for one decomposition run
///
/// Every `Option` is an override; `None` lets the adaptive rules decide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct X11Config {
    /// Observations per cycle (12 monthly, 4 quarterly)
    pub period: usize,
    pub mode: DecompositionMode,
    /// Fixed Henderson span for every stage (odd)
    pub henderson_span: Option<usize>,
    /// Fixed seasonal moving average for the second seasonal pass
    pub seasonal_span: Option<SeasonalSpan>,
    /// Edge half-width of the Henderson passes
    pub trend_half_width: Option<usize>,
    /// Edge half-width (in cycles) of the seasonal passes
    pub seasonal_half_width: Option<usize>,
    pub outlier: OutlierParameters,
    pub cache_policy: CachePolicy,
}

impl X11Config {
    /// Defaults for `period`
    pub fn new(period: usize) -> Self {
        Self {
            period,
            mode: DecompositionMode::default(),
            henderson_span: None,
            seasonal_span: None,
            trend_half_width: None,
            seasonal_half_width: None,
            outlier: OutlierParameters::default(),
            cache_policy: CachePolicy::default(),
        }
    }

    pub fn builder(period: usize) -> X11ConfigBuilder {
        X11ConfigBuilder::new(period)
    }

    /// Checks that do not depend on the data
    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(Error::InvalidParameter("period must be at least 1".to_string()));
        }
        if let Some(span) = self.henderson_span {
            if span == 0 || span % 2 == 0 {
                return Err(Error::InvalidParameter(format!(
                    "Henderson span must be odd and positive, got {span}"
                )));
            }
        }
        if self.trend_half_width == Some(0) || self.seasonal_half_width == Some(0) {
            return Err(Error::InvalidParameter(
                "edge half-width overrides must be positive".to_string(),
            ));
        }
        self.outlier.validate()
    }

    /// Outlier window half-width for this period
    pub fn outlier_half_bandwidth(&self) -> usize {
        self.outlier.resolve_half_bandwidth(self.period)
    }

    /// Longest Henderson span any stage can choose
    pub fn max_henderson_span(&self) -> usize {
        self.henderson_span
            .unwrap_or_else(|| HendersonRegime::Long.span(self.period))
    }

    /// Checks against a series of `n` observations
    ///
    /// Spans chosen adaptively are stepped down to fit; explicit overrides
    /// and edge half-widths must fit as given.
    pub fn validate_for_length(&self, n: usize) -> Result<()> {
        let years = n / self.period;
        if let Some(span) = self.seasonal_span {
            if span.half_width() > years {
                return Err(Error::span_too_long(span.half_width(), years));
            }
        }
        if let Some(span) = self.henderson_span {
            if (span - 1) / 2 > n {
                return Err(Error::span_too_long((span - 1) / 2, n));
            }
        }
        if let Some(h) = self.trend_half_width {
            let reach = (self.max_henderson_span() - 1) / 2;
            if h < reach {
                return Err(Error::InvalidParameter(format!(
                    "trend half-width {h} is shorter than the Henderson reach {reach}"
                )));
            }
            if h > n {
                return Err(Error::span_too_long(h, n));
            }
        }
        if let Some(h) = self.seasonal_half_width {
            let widest = match self.seasonal_span {
                Some(span) => span.half_width(),
                None => SeasonalSpan::S3x9.fit_to_years(years)?.half_width(),
            }
            .max(SeasonalSpan::S3x5.fit_to_years(years)?.half_width());
            if h < widest {
                return Err(Error::InvalidParameter(format!(
                    "seasonal half-width {h} is shorter than the seasonal reach {widest}"
                )));
            }
            if h > years {
                return Err(Error::span_too_long(h, years));
            }
        }
        Ok(())
    }
}

/// Chained construction of an [`X11Config`]
#[derive(Debug, Clone)]
pub struct X11ConfigBuilder {
    config: X11Config,
}

impl X11ConfigBuilder {
    pub fn new(period: usize) -> Self {
        Self {
            config: X11Config::new(period),
        }
    }

    pub fn mode(mut self, mode: DecompositionMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn multiplicative(self) -> Self {
        self.mode(DecompositionMode::Multiplicative)
    }

    pub fn log_additive(self) -> Self {
        self.mode(DecompositionMode::LogAdditive)
    }

    /// Use this Henderson span in every stage
    pub fn henderson_span(mut self, span: usize) -> Self {
        self.config.henderson_span = Some(span);
        self
    }

    /// Use this span for the second seasonal pass of every stage
    pub fn seasonal_span(mut self, span: SeasonalSpan) -> Self {
        self.config.seasonal_span = Some(span);
        self
    }

    pub fn trend_half_width(mut self, half_width: usize) -> Self {
        self.config.trend_half_width = Some(half_width);
        self
    }

    pub fn seasonal_half_width(mut self, half_width: usize) -> Self {
        self.config.seasonal_half_width = Some(half_width);
        self
    }

    pub fn outlier_parameters(mut self, params: OutlierParameters) -> Self {
        self.config.outlier = params;
        self
    }

    /// Sigma limits of the extreme-value detector
    pub fn sigma_limits(mut self, lower: f64, upper: f64) -> Self {
        self.config.outlier.lower_sigma = lower;
        self.config.outlier.upper_sigma = upper;
        self
    }

    pub fn outlier_half_bandwidth(mut self, half_bandwidth: usize) -> Self {
        self.config.outlier.half_bandwidth = Some(half_bandwidth);
        self
    }

    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.config.cache_policy = policy;
        self
    }

    pub fn build(self) -> Result<X11Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
