//! Generic filter toolkit for seasonal decomposition
//!
//! - [`weights`]: the kernel weighter, one [`KernelSpec`] variant per filter family
//! - [`analytic`]: globally fitted families (HP, spline, polynomial, mean, linear)
//! - [`padding`]: mirror/extend edge handling
//! - [`smoother`]: the weighted smoother, optionally backed by a weight cache
//! - [`period`]: split a series by cycle position and join it back
//! - [`seasonal`]: period-wise smoothing built from the two above
//!
//! # Example
//!
//! ```rust
//! use x11_core::ScalarBackend;
//! use x11_filter::{KernelSpec, WeightedSmoother};
//!
//! let smoother = WeightedSmoother::new(ScalarBackend, "henderson(5)".parse::<KernelSpec>()?)?;
//! let trend = smoother.smooth(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
//! assert_eq!(trend.len(), 6);
//! # Ok::<(), x11_core::Error>(())
//! ```

pub mod analytic;
pub mod padding;
pub mod period;
pub mod seasonal;
pub mod smoother;
pub mod traits;
pub mod weights;

pub use padding::{pad, trim, EdgeMode, EdgePolicy};
pub use period::{cycle_count, cycle_position, join, split};
pub use seasonal::SeasonalFilter;
pub use smoother::{WeightCache, WeightedSmoother};
pub use traits::Smoother;
pub use weights::{convolve, henderson, KernelKind, KernelSpec, WeightKey, Weights};
