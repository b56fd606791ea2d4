//! Core traits and types for X-11 style seasonal decomposition
//!
//! This crate provides the foundation shared by the filter toolkit, the
//! outlier detector and the decomposition pipeline:
//!
//! 1. **Primitives** - scalar reductions every kernel is written against
//! 2. **Kernels** - the trait smoothers and detectors implement
//! 3. **Series model** - NaN as the missing sentinel, gap interpolation
//! 4. **Residual operator** - difference/ratio normalization and its inverse
//! 5. **Cache** - an explicit, injectable memo table for filter weights
//!
//! # Example
//!
//! ```rust
//! use x11_core::{normalize, recombine};
//!
//! let data = vec![150.0, 75.0];
//! let trend = vec![100.0, 100.0];
//! let ratio = normalize(&data, &trend, true);
//! assert_eq!(ratio, vec![1.5, 0.75]);
//! assert_eq!(recombine(&trend, &ratio, true), data);
//! ```

pub mod cache;
pub mod error;
pub mod kernels;
pub mod primitives;
pub mod residual;
pub mod series;
pub mod utils;

// Re-export core types
pub use error::{Error, Result};

pub use cache::{CachePolicy, CacheStats, ComputationCache};
pub use kernels::StatisticalKernel;
pub use primitives::{scalar_backend, ComputePrimitives, ScalarBackend};
pub use residual::{normalize, recombine, DecompositionMode, ResidualOp};
pub use series::{count_present, interpolate_missing, is_missing, validate_finite, MISSING};
pub use utils::{approx_zero, map_columns, odd_down, odd_up};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CachePolicy, ComputationCache, ComputePrimitives, DecompositionMode, Error, ResidualOp,
        Result, ScalarBackend, StatisticalKernel,
    };
}
