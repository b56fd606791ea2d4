//! Shared utilities for integration tests

pub use approx::assert_relative_eq;

pub const EPSILON: f64 = 1e-10;

/// Monthly-style series with a linear trend and a sinusoidal season
pub fn seasonal_series(len: usize, period: usize) -> Vec<f64> {
    (0..len)
        .map(|t| {
            let phase = 2.0 * std::f64::consts::PI * t as f64 / period as f64;
            100.0 + 0.5 * t as f64 + 10.0 * phase.sin()
        })
        .collect()
}

/// Assert two vectors are equal within tolerance
pub fn assert_vectors_equal(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (&a, &e) in actual.iter().zip(expected) {
        assert_relative_eq!(a, e, epsilon = EPSILON);
    }
}
