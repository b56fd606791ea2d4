//! X-11 seasonal decomposition
//!
//! Splits an equally spaced series into trend-cycle, seasonal and irregular
//! components by iterated moving averages:
//!
//! - stages B, C and D each estimate a trend, a seasonal and an irregular,
//!   replacing extreme values before handing a corrected series on;
//! - filter spans adapt to the data through the I/C ratio (Henderson) and
//!   the moving seasonality ratio (seasonal, stage D);
//! - stage E damps stage C's extremes in the final irregular and
//!   seasonally adjusted series.
//!
//! # Example
//!
//! ```rust
//! use x11_decompose::{X11Config, X11Decomposer};
//!
//! let data: Vec<f64> = (0..96)
//!     .map(|t| 100.0 + 10.0 * (2.0 * std::f64::consts::PI * t as f64 / 12.0).sin())
//!     .collect();
//! let decomposer = X11Decomposer::new(X11Config::builder(12).build()?)?;
//! let result = decomposer.decompose(&data)?;
//! assert_eq!(result.trend.len(), data.len());
//! # Ok::<(), x11_core::Error>(())
//! ```

pub mod config;
pub mod decomposer;
pub mod final_stage;
pub mod result;
pub mod spans;
pub mod stage;

pub use config::{X11Config, X11ConfigBuilder};
pub use decomposer::X11Decomposer;
pub use final_stage::{apply_final_dampening, ModifiedSeries};
pub use result::X11Result;
pub use spans::{
    absolute_growth, degenerate_ratio, finite_sample_corrections, ic_ratio,
    moving_seasonality_ratio, select_henderson, select_seasonal, HendersonRegime, SeasonalSpan,
};
pub use stage::{run_stage, StageContext, StageDiagnostics, StageKind, StageOutput};
