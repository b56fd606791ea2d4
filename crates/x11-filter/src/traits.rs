//! Smoother abstraction shared by series-wise and period-wise filters

use x11_core::Result;

/// Anything that maps a series to a smoothed series of the same length
pub trait Smoother: Send + Sync {
    /// Smooth `series`; the output has the same length
    fn smooth(&self, series: &[f64]) -> Result<Vec<f64>>;

    /// Human-readable description for logs and diagnostics
    fn describe(&self) -> String;

    /// Padding half-width applied at each end
    fn reach(&self) -> Result<usize>;
}
