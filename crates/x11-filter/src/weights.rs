//! Kernel weighter
//!
//! Every smoothing family is a variant of [`KernelSpec`] carrying exactly the
//! parameters it needs. Convolution-type families resolve to a finite
//! [`Weights`] vector summing to one; the analytic families (Hodrick-Prescott,
//! smoothing spline, polynomial, mean, linear) are fitted globally by
//! [`crate::analytic`] and have no fixed vector.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use x11_core::{Error, Result};

/// Relative weight below which infinite-support kernels are truncated
pub const TRUNCATION_TOLERANCE: f64 = 1e-9;

/// Longest half-width an infinite-support kernel may truncate to
const MAX_TRUNCATED_HALF_WIDTH: usize = 10_000;

/// Kernel shape used by [`KernelSpec::Kernel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelKind {
    Uniform,
    Triangular,
    Epanechnikov,
    Biweight,
    Triweight,
    Tricube,
    Cosine,
    Gaussian,
    Logistic,
}

impl KernelKind {
    /// Unnormalized kernel profile at `u`
    ///
    /// Finite-support kernels vanish for `|u| >= 1`.
    pub fn profile(&self, u: f64) -> f64 {
        let a = u.abs();
        if self.is_finite_support() && a >= 1.0 {
            return 0.0;
        }
        match self {
            KernelKind::Uniform => 1.0,
            KernelKind::Triangular => 1.0 - a,
            KernelKind::Epanechnikov => 1.0 - a * a,
            KernelKind::Biweight => (1.0 - a * a).powi(2),
            KernelKind::Triweight => (1.0 - a * a).powi(3),
            KernelKind::Tricube => (1.0 - a * a * a).powi(3),
            KernelKind::Cosine => (std::f64::consts::FRAC_PI_2 * a).cos(),
            KernelKind::Gaussian => (-0.5 * a * a).exp(),
            KernelKind::Logistic => 1.0 / (a.exp() + 2.0 + (-a).exp()),
        }
    }

    pub fn is_finite_support(&self) -> bool {
        !matches!(self, KernelKind::Gaussian | KernelKind::Logistic)
    }

    pub fn name(&self) -> &'static str {
        match self {
            KernelKind::Uniform => "uniform",
            KernelKind::Triangular => "triangular",
            KernelKind::Epanechnikov => "epanechnikov",
            KernelKind::Biweight => "biweight",
            KernelKind::Triweight => "triweight",
            KernelKind::Tricube => "tricube",
            KernelKind::Cosine => "cosine",
            KernelKind::Gaussian => "gaussian",
            KernelKind::Logistic => "logistic",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "uniform" | "rectangular" => KernelKind::Uniform,
            "triangular" | "triangle" => KernelKind::Triangular,
            "epanechnikov" => KernelKind::Epanechnikov,
            "biweight" | "quartic" => KernelKind::Biweight,
            "triweight" => KernelKind::Triweight,
            "tricube" => KernelKind::Tricube,
            "cosine" => KernelKind::Cosine,
            "gaussian" | "normal" => KernelKind::Gaussian,
            "logistic" => KernelKind::Logistic,
            _ => return None,
        };
        Some(kind)
    }
}

/// A smoothing filter family and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KernelSpec {
    /// Equal weights over `span` terms
    MovingAverage { span: usize },
    /// Centred moving average; an even span uses `span + 1` terms with half-weight ends
    CenteredMovingAverage { span: usize },
    /// One-sided average of the current and `span - 1` previous terms
    TrailingMovingAverage { span: usize },
    /// Successive moving averages, e.g. `[3, 3]` for a 3×3
    Composite { spans: Vec<usize> },
    /// Henderson trend filter; `span` must be odd
    Henderson { span: usize },
    /// Kernel-weighted average over `2 * bandwidth + 1` terms, or truncated
    /// at [`TRUNCATION_TOLERANCE`] for infinite support with scale `bandwidth`
    Kernel { kind: KernelKind, bandwidth: usize },
    HodrickPrescott { lambda: f64 },
    SmoothingSpline { lambda: f64 },
    Polynomial { degree: usize },
    Mean,
    Linear,
}

impl KernelSpec {
    /// Build a spec from a family name and up to three numeric parameters
    ///
    /// Span-like parameters must be positive integers. Supplying too few or
    /// too many parameters is an error.
    pub fn from_name(name: &str, params: &[f64]) -> Result<Self> {
        if params.len() > 3 {
            return Err(Error::InvalidParameter(format!(
                "filter family {name} accepts at most 3 parameters, got {}",
                params.len()
            )));
        }
        let family = name.trim().to_ascii_lowercase();
        let family = family.as_str();

        let spec = match family {
            "ma" | "moving_average" => {
                expect_params(family, params, 1)?;
                KernelSpec::MovingAverage { span: count_param(family, "span", params[0])? }
            }
            "cma" | "centered" | "centered_moving_average" => {
                expect_params(family, params, 1)?;
                KernelSpec::CenteredMovingAverage {
                    span: count_param(family, "span", params[0])?,
                }
            }
            "trailing" | "trailing_moving_average" => {
                expect_params(family, params, 1)?;
                KernelSpec::TrailingMovingAverage {
                    span: count_param(family, "span", params[0])?,
                }
            }
            "composite" => {
                if params.is_empty() {
                    return Err(Error::missing_parameter(family, "span"));
                }
                let spans = params
                    .iter()
                    .map(|&p| count_param(family, "span", p))
                    .collect::<Result<Vec<_>>>()?;
                KernelSpec::Composite { spans }
            }
            "henderson" => {
                expect_params(family, params, 1)?;
                KernelSpec::Henderson { span: count_param(family, "span", params[0])? }
            }
            "hp" | "hodrick_prescott" => {
                expect_params(family, params, 1)?;
                KernelSpec::HodrickPrescott { lambda: params[0] }
            }
            "spline" | "smoothing_spline" => {
                expect_params(family, params, 1)?;
                KernelSpec::SmoothingSpline { lambda: params[0] }
            }
            "polynomial" | "poly" => {
                expect_params(family, params, 1)?;
                KernelSpec::Polynomial {
                    degree: degree_param(family, params[0])?,
                }
            }
            "mean" => {
                expect_params(family, params, 0)?;
                KernelSpec::Mean
            }
            "linear" | "detrend" => {
                expect_params(family, params, 0)?;
                KernelSpec::Linear
            }
            other => match KernelKind::from_name(other) {
                Some(kind) => {
                    expect_params(other, params, 1)?;
                    KernelSpec::Kernel {
                        kind,
                        bandwidth: count_param(other, "bandwidth", params[0])?,
                    }
                }
                None => return Err(Error::UnknownFilter(name.to_string())),
            },
        };

        spec.validate()?;
        Ok(spec)
    }

    /// Check invariants of a directly constructed spec
    pub fn validate(&self) -> Result<()> {
        let positive = |span: usize, what: &str| {
            if span == 0 {
                Err(Error::InvalidParameter(format!(
                    "{} {what} must be positive",
                    self.family()
                )))
            } else {
                Ok(())
            }
        };
        match self {
            KernelSpec::MovingAverage { span }
            | KernelSpec::CenteredMovingAverage { span }
            | KernelSpec::TrailingMovingAverage { span } => positive(*span, "span"),
            KernelSpec::Composite { spans } => {
                if spans.is_empty() {
                    return Err(Error::missing_parameter("composite", "span"));
                }
                spans.iter().try_for_each(|&s| positive(s, "span"))
            }
            KernelSpec::Henderson { span } => {
                positive(*span, "span")?;
                if span % 2 == 0 {
                    return Err(Error::InvalidParameter(format!(
                        "henderson span must be odd, got {span}"
                    )));
                }
                Ok(())
            }
            KernelSpec::Kernel { bandwidth, .. } => positive(*bandwidth, "bandwidth"),
            KernelSpec::HodrickPrescott { lambda } | KernelSpec::SmoothingSpline { lambda } => {
                if !lambda.is_finite() || *lambda <= 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "{} lambda must be positive and finite, got {lambda}",
                        self.family()
                    )));
                }
                Ok(())
            }
            KernelSpec::Polynomial { .. } | KernelSpec::Mean | KernelSpec::Linear => Ok(()),
        }
    }

    /// Canonical family name
    pub fn family(&self) -> &'static str {
        match self {
            KernelSpec::MovingAverage { .. } => "ma",
            KernelSpec::CenteredMovingAverage { .. } => "cma",
            KernelSpec::TrailingMovingAverage { .. } => "trailing",
            KernelSpec::Composite { .. } => "composite",
            KernelSpec::Henderson { .. } => "henderson",
            KernelSpec::Kernel { kind, .. } => kind.name(),
            KernelSpec::HodrickPrescott { .. } => "hp",
            KernelSpec::SmoothingSpline { .. } => "spline",
            KernelSpec::Polynomial { .. } => "polynomial",
            KernelSpec::Mean => "mean",
            KernelSpec::Linear => "linear",
        }
    }

    /// Whether this family is fitted globally rather than convolved
    pub fn is_analytic(&self) -> bool {
        matches!(
            self,
            KernelSpec::HodrickPrescott { .. }
                | KernelSpec::SmoothingSpline { .. }
                | KernelSpec::Polynomial { .. }
                | KernelSpec::Mean
                | KernelSpec::Linear
        )
    }

    /// Hashable identity of this spec
    pub fn key(&self) -> WeightKey {
        let params: Vec<f64> = match self {
            KernelSpec::MovingAverage { span }
            | KernelSpec::CenteredMovingAverage { span }
            | KernelSpec::TrailingMovingAverage { span }
            | KernelSpec::Henderson { span } => vec![*span as f64],
            KernelSpec::Composite { spans } => spans.iter().map(|&s| s as f64).collect(),
            KernelSpec::Kernel { bandwidth, .. } => vec![*bandwidth as f64],
            KernelSpec::HodrickPrescott { lambda } | KernelSpec::SmoothingSpline { lambda } => {
                vec![*lambda]
            }
            KernelSpec::Polynomial { degree } => vec![*degree as f64],
            KernelSpec::Mean | KernelSpec::Linear => Vec::new(),
        };
        WeightKey {
            family: self.family(),
            params: params.into_iter().map(OrderedFloat).collect(),
        }
    }

    /// Resolve to a weight vector; `None` for analytic families
    pub fn weights(&self) -> Result<Option<Weights>> {
        self.validate()?;
        let weights = match self {
            KernelSpec::MovingAverage { span } => {
                Weights::new(uniform(*span), (span - 1) / 2)?
            }
            KernelSpec::CenteredMovingAverage { span } => {
                let values = centered_moving_average(*span);
                let centre = (values.len() - 1) / 2;
                Weights::new(values, centre)?
            }
            KernelSpec::TrailingMovingAverage { span } => Weights::new(uniform(*span), span - 1)?,
            KernelSpec::Composite { spans } => {
                let values = spans
                    .iter()
                    .fold(vec![1.0], |acc, &s| convolve(&acc, &uniform(s)));
                let centre = (values.len() - 1) / 2;
                Weights::new(values, centre)?
            }
            KernelSpec::Henderson { span } => Weights::new(henderson(*span), (span - 1) / 2)?,
            KernelSpec::Kernel { kind, bandwidth } => {
                let values = kernel_weights(*kind, *bandwidth)?;
                let centre = (values.len() - 1) / 2;
                Weights::new(values, centre)?
            }
            _ => return Ok(None),
        };
        Ok(Some(weights))
    }
}

impl fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key();
        if key.params.is_empty() {
            return write!(f, "{}", key.family);
        }
        let params: Vec<String> = key.params.iter().map(|p| p.0.to_string()).collect();
        write!(f, "{}({})", key.family, params.join(","))
    }
}

impl FromStr for KernelSpec {
    type Err = Error;

    /// Parse `family` or `family(p1,p2,p3)`, e.g. `henderson(13)` or `composite(3,3)`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, params) = match s.find('(') {
            Some(open) => {
                let close = s.rfind(')').filter(|&c| c > open).ok_or_else(|| {
                    Error::InvalidParameter(format!("unbalanced parentheses in filter '{s}'"))
                })?;
                let inner = &s[open + 1..close];
                let params = inner
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(|p| {
                        p.parse::<f64>().map_err(|_| {
                            Error::InvalidParameter(format!("filter parameter '{p}' is not a number"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                (&s[..open], params)
            }
            None => (s, Vec::new()),
        };
        KernelSpec::from_name(name, &params)
    }
}

/// Hashable cache key for a [`KernelSpec`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeightKey {
    pub family: &'static str,
    pub params: Vec<OrderedFloat<f64>>,
}

/// Normalized filter weights
///
/// `centre` is the index of the weight applied to the output position, so
/// the filter reaches `centre` points back and `len - 1 - centre` forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    values: Vec<f64>,
    centre: usize,
}

impl Weights {
    /// Normalize `values` to unit sum
    pub fn new(values: Vec<f64>, centre: usize) -> Result<Self> {
        if values.is_empty() || centre >= values.len() {
            return Err(Error::InvalidParameter(format!(
                "weight centre {centre} outside vector of length {}",
                values.len()
            )));
        }
        let total: f64 = values.iter().sum();
        if !total.is_finite() || total.abs() < f64::EPSILON {
            return Err(Error::Computation(
                "filter weights sum to zero and cannot be normalized".to_string(),
            ));
        }
        Ok(Self {
            values: values.into_iter().map(|w| w / total).collect(),
            centre,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn centre(&self) -> usize {
        self.centre
    }

    pub fn left_reach(&self) -> usize {
        self.centre
    }

    pub fn right_reach(&self) -> usize {
        self.values.len() - 1 - self.centre
    }

    /// Padding needed on either side for a full window everywhere
    pub fn half_width(&self) -> usize {
        self.left_reach().max(self.right_reach())
    }

    pub fn is_symmetric(&self) -> bool {
        self.left_reach() == self.right_reach()
            && self
                .values
                .iter()
                .zip(self.values.iter().rev())
                .all(|(a, b)| (a - b).abs() <= 1e-12)
    }
}

fn expect_params(family: &str, params: &[f64], required: usize) -> Result<()> {
    if params.len() < required {
        return Err(Error::missing_parameter(family, parameter_name(family)));
    }
    if params.len() > required {
        return Err(Error::InvalidParameter(format!(
            "filter family {family} takes {required} parameter(s), got {}",
            params.len()
        )));
    }
    Ok(())
}

fn parameter_name(family: &str) -> &'static str {
    match family {
        "hp" | "hodrick_prescott" | "spline" | "smoothing_spline" => "lambda",
        "polynomial" | "poly" => "degree",
        "ma" | "moving_average" | "cma" | "centered" | "centered_moving_average" | "trailing"
        | "trailing_moving_average" | "henderson" => "span",
        _ => "bandwidth",
    }
}

fn count_param(family: &str, name: &str, value: f64) -> Result<usize> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{family} {name} must be positive, got {value}"
        )));
    }
    if value.fract() != 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{family} {name} must be a whole number of terms, got {value}"
        )));
    }
    Ok(value as usize)
}

fn degree_param(family: &str, value: f64) -> Result<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{family} degree must be a non-negative integer, got {value}"
        )));
    }
    Ok(value as usize)
}

fn uniform(span: usize) -> Vec<f64> {
    vec![1.0 / span as f64; span]
}

fn centered_moving_average(span: usize) -> Vec<f64> {
    if span % 2 == 1 {
        return uniform(span);
    }
    let mut values = vec![1.0 / span as f64; span + 1];
    values[0] = 0.5 / span as f64;
    values[span] = 0.5 / span as f64;
    values
}

/// Full discrete convolution
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Henderson weights for an odd span
///
/// Closed form with `m = (span - 1) / 2` and `n = m + 2`:
/// `w_j ∝ ((n-1)² - j²)(n² - j²)((n+1)² - j²)(3n² - 16 - 11j²)`.
pub fn henderson(span: usize) -> Vec<f64> {
    let m = (span.max(1) - 1) / 2;
    let n = (m + 2) as f64;
    let n2 = n * n;
    let denom = 8.0 * n * (n2 - 1.0) * (4.0 * n2 - 1.0) * (4.0 * n2 - 9.0) * (4.0 * n2 - 25.0);
    (-(m as i64)..=m as i64)
        .map(|j| {
            let j2 = (j * j) as f64;
            315.0
                * ((n - 1.0).powi(2) - j2)
                * (n2 - j2)
                * ((n + 1.0).powi(2) - j2)
                * (3.0 * n2 - 16.0 - 11.0 * j2)
                / denom
        })
        .collect()
}

fn kernel_weights(kind: KernelKind, bandwidth: usize) -> Result<Vec<f64>> {
    if kind.is_finite_support() {
        let scale = (bandwidth + 1) as f64;
        let b = bandwidth as i64;
        return Ok((-b..=b).map(|j| kind.profile(j as f64 / scale)).collect());
    }

    let scale = bandwidth as f64;
    let peak = kind.profile(0.0);
    let mut half = 0usize;
    while kind.profile((half + 1) as f64 / scale) >= TRUNCATION_TOLERANCE * peak {
        half += 1;
        if half > MAX_TRUNCATED_HALF_WIDTH {
            return Err(Error::InvalidParameter(format!(
                "{} bandwidth {bandwidth} does not truncate within {MAX_TRUNCATED_HALF_WIDTH} terms",
                kind.name()
            )));
        }
    }
    let h = half as i64;
    Ok((-h..=h).map(|j| kind.profile(j as f64 / scale)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn sum(w: &Weights) -> f64 {
        w.values().iter().sum()
    }

    #[test]
    fn test_henderson_13_known_weights() {
        let w = KernelSpec::Henderson { span: 13 }.weights().unwrap().unwrap();
        assert_eq!(w.len(), 13);
        assert!(w.is_symmetric());
        assert_relative_eq!(w.values()[6], 0.24006, epsilon = 1e-5);
        assert_relative_eq!(w.values()[0], -0.01935, epsilon = 1e-5);
        assert_relative_eq!(sum(&w), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_henderson_preserves_cubic() {
        let w = KernelSpec::Henderson { span: 9 }.weights().unwrap().unwrap();
        let cubic: Vec<f64> = (-4..=4).map(|t| {
            let t = t as f64;
            2.0 + t - 0.5 * t * t + 0.1 * t * t * t
        }).collect();
        let fitted: f64 = w.values().iter().zip(&cubic).map(|(a, b)| a * b).sum();
        assert_relative_eq!(fitted, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_centered_moving_average_even_span() {
        let w = KernelSpec::CenteredMovingAverage { span: 12 }.weights().unwrap().unwrap();
        assert_eq!(w.len(), 13);
        assert_eq!(w.centre(), 6);
        assert_relative_eq!(w.values()[0], 1.0 / 24.0);
        assert_relative_eq!(w.values()[6], 1.0 / 12.0);
    }

    #[test]
    fn test_composite_3x3() {
        let w = KernelSpec::Composite { spans: vec![3, 3] }.weights().unwrap().unwrap();
        let expected = [1.0, 2.0, 3.0, 2.0, 1.0].map(|v| v / 9.0);
        for (a, e) in w.values().iter().zip(expected) {
            assert_relative_eq!(*a, e, epsilon = 1e-12);
        }
        assert_eq!(w.half_width(), 2);
    }

    #[test]
    fn test_trailing_average_is_one_sided() {
        let w = KernelSpec::TrailingMovingAverage { span: 4 }.weights().unwrap().unwrap();
        assert_eq!(w.left_reach(), 3);
        assert_eq!(w.right_reach(), 0);
        assert!(!w.is_symmetric());
    }

    #[test]
    fn test_gaussian_truncates() {
        let w = KernelSpec::Kernel { kind: KernelKind::Gaussian, bandwidth: 2 }
            .weights()
            .unwrap()
            .unwrap();
        // exp(-u^2/2) < 1e-9 once u > ~6.44, so 2 * 6 = 12 terms each side
        assert_eq!(w.half_width(), 12);
        assert_relative_eq!(sum(&w), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_analytic_families_have_no_vector() {
        assert!(KernelSpec::HodrickPrescott { lambda: 1600.0 }.weights().unwrap().is_none());
        assert!(KernelSpec::Mean.weights().unwrap().is_none());
        assert!(KernelSpec::Linear.is_analytic());
    }

    #[test]
    fn test_from_name_and_parse() {
        assert_eq!(
            KernelSpec::from_name("Henderson", &[13.0]).unwrap(),
            KernelSpec::Henderson { span: 13 }
        );
        assert_eq!(
            "composite(3, 5)".parse::<KernelSpec>().unwrap(),
            KernelSpec::Composite { spans: vec![3, 5] }
        );
        assert_eq!(
            "epanechnikov(4)".parse::<KernelSpec>().unwrap(),
            KernelSpec::Kernel { kind: KernelKind::Epanechnikov, bandwidth: 4 }
        );
        assert_eq!("mean".parse::<KernelSpec>().unwrap(), KernelSpec::Mean);
        assert_eq!(KernelSpec::Henderson { span: 23 }.to_string(), "henderson(23)");
        assert_eq!(
            KernelSpec::Composite { spans: vec![3, 9] }.to_string().parse::<KernelSpec>().unwrap(),
            KernelSpec::Composite { spans: vec![3, 9] }
        );
    }

    #[test]
    fn test_configuration_errors() {
        assert!(matches!(
            KernelSpec::from_name("loess", &[5.0]),
            Err(Error::UnknownFilter(_))
        ));
        assert!(matches!(
            KernelSpec::from_name("henderson", &[]),
            Err(Error::MissingParameter { .. })
        ));
        assert!(matches!(
            KernelSpec::from_name("hp", &[]),
            Err(Error::MissingParameter { .. })
        ));
        assert!(matches!(
            KernelSpec::from_name("ma", &[0.0]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelSpec::from_name("ma", &[-3.0]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelSpec::from_name("ma", &[2.5]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelSpec::from_name("henderson", &[12.0]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelSpec::from_name("mean", &[1.0]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelSpec::from_name("composite", &[3.0, 3.0, 3.0, 3.0]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_weight_keys_distinguish_parameters() {
        let a = KernelSpec::HodrickPrescott { lambda: 1600.0 }.key();
        let b = KernelSpec::HodrickPrescott { lambda: 14400.0 }.key();
        assert_ne!(a, b);
        assert_eq!(a, KernelSpec::HodrickPrescott { lambda: 1600.0 }.key());
    }

    fn finite_specs() -> impl Strategy<Value = KernelSpec> {
        let kinds = prop_oneof![
            Just(KernelKind::Uniform),
            Just(KernelKind::Triangular),
            Just(KernelKind::Epanechnikov),
            Just(KernelKind::Biweight),
            Just(KernelKind::Triweight),
            Just(KernelKind::Tricube),
            Just(KernelKind::Cosine),
            Just(KernelKind::Gaussian),
            Just(KernelKind::Logistic),
        ];
        prop_oneof![
            (1usize..40).prop_map(|span| KernelSpec::MovingAverage { span }),
            (1usize..40).prop_map(|span| KernelSpec::CenteredMovingAverage { span }),
            (1usize..40).prop_map(|span| KernelSpec::TrailingMovingAverage { span }),
            prop::collection::vec(1usize..12, 1..4).prop_map(|spans| KernelSpec::Composite { spans }),
            (0usize..20).prop_map(|m| KernelSpec::Henderson { span: 2 * m + 1 }),
            (kinds, 1usize..15).prop_map(|(kind, bandwidth)| KernelSpec::Kernel { kind, bandwidth }),
        ]
    }

    proptest! {
        #[test]
        fn weights_sum_to_one(spec in finite_specs()) {
            let w = spec.weights().unwrap().unwrap();
            let total: f64 = w.values().iter().sum();
            prop_assert!((total - 1.0).abs() <= 1e-9);
            prop_assert!(w.centre() < w.len());
        }
    }
}
