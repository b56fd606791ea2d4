//! Extreme value detection and downweighting
//!
//! A centred residual series (SI values or an irregular minus its neutral
//! value) is scanned with a sliding mean/sigma band:
//!
//! - points within `lower_sigma` (default 1.5) keep weight 1
//! - points beyond `upper_sigma` (default 2.5) get weight 0
//! - the weight ramps linearly in between
//!
//! Points above the lower limit are flagged, and [`substitute_extremes`]
//! pulls them toward a local period-wise mean.
//!
//! # Example
//!
//! ```rust
//! use x11_core::ScalarBackend;
//! use x11_outlier::{OutlierDetector, SlidingWindowDetector};
//!
//! let mut residual = vec![0.0; 25];
//! residual[12] = 5.0;
//! let result = SlidingWindowDetector::new(ScalarBackend).detect(&residual, 12)?;
//! assert_eq!(result.flagged_indices(), vec![12]);
//! # Ok::<(), x11_core::Error>(())
//! ```

pub mod detector;
pub mod substitute;
pub mod traits;
pub mod types;

pub use detector::SlidingWindowDetector;
pub use substitute::substitute_extremes;
pub use traits::{OutlierDetector, OutlierDetectorProperties};
pub use types::{OutlierParameters, OutlierResult};
