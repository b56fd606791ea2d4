//! X-11 style seasonal decomposition
//!
//! Umbrella crate over the workspace:
//!
//! - [`x11_core`]: errors, compute primitives, missing values, residual operator, cache
//! - [`x11_filter`]: kernel weights, weighted and seasonal smoothers, period split/join
//! - [`x11_outlier`]: sliding-window extreme detection and substitution
//! - [`x11_decompose`]: stages B to E and the adaptive span rules
//!
//! # Example
//!
//! ```rust
//! use x11_seasonal::prelude::*;
//!
//! let data: Vec<f64> = (0..48)
//!     .map(|t| 20.0 + 0.1 * t as f64 + [2.0, -1.0, -3.0, 2.0][t % 4])
//!     .collect();
//! let config = X11Config::builder(4).build()?;
//! let result = X11Decomposer::new(config)?.decompose(&data)?;
//! println!("{result}");
//! # Ok::<(), Error>(())
//! ```

pub use x11_core;
pub use x11_decompose;
pub use x11_filter;
pub use x11_outlier;

pub use x11_core::{DecompositionMode, Error, Result};
pub use x11_decompose::{X11Config, X11Decomposer, X11Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
///
/// ```rust
/// use x11_seasonal::prelude::*;
///
/// let smoother = WeightedSmoother::new(ScalarBackend, "henderson(13)".parse::<KernelSpec>()?)?;
/// let flat = smoother.smooth(&[5.0; 30])?;
/// assert!(flat.iter().all(|v| (v - 5.0).abs() < 1e-9));
///
/// let mut residual = vec![0.0; 30];
/// residual[12] = 8.0;
/// let outliers = SlidingWindowDetector::new(ScalarBackend).detect(&residual, 15)?;
/// assert_eq!(outliers.flagged_indices(), vec![12]);
///
/// let data: Vec<f64> = (0..72)
///     .map(|t| 40.0 + 0.2 * t as f64 + [3.0, 1.0, -1.0, -3.0, 0.5, -0.5][t % 6])
///     .collect();
/// let result = X11Decomposer::new(X11Config::builder(6).build()?)?.decompose(&data)?;
/// for (i, value) in data.iter().enumerate() {
///     assert!((result.seasonally_adjusted[i] + result.seasonal[i] - value).abs() < 1e-9);
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub mod prelude {
    pub use x11_core::prelude::*;
    pub use x11_decompose::{
        SeasonalSpan, StageKind, X11Config, X11ConfigBuilder, X11Decomposer, X11Result,
    };
    pub use x11_filter::{EdgeMode, KernelSpec, SeasonalFilter, Smoother, WeightedSmoother};
    pub use x11_outlier::{OutlierDetector, OutlierParameters, SlidingWindowDetector};
}
