//! Error types for seasonal decomposition
//!
//! Provides a unified error type for all x11 crates.

use thiserror::Error;

/// Core error type for decomposition and filtering
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} observations, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Filter family name that no smoother knows about
    #[error("Unknown filter family: {0}")]
    UnknownFilter(String),

    /// A filter family was named without one of its required parameters
    #[error("Missing parameter '{parameter}' for filter family {family}")]
    MissingParameter { family: String, parameter: String },

    /// A span or padding half-width does not fit the series
    #[error("Span too long: {span} exceeds series length {length}")]
    SpanTooLong { span: usize, length: usize },

    /// Zero or negative value under a ratio-based mode
    #[error("Non-positive value {value} at index {index} requires additive mode")]
    NonPositiveData { index: usize, value: f64 },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Cache-related error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str, index: usize) -> Self {
        Self::InvalidInput(format!("{context} contains a non-finite value at index {index}"))
    }

    /// Create an error for a half-width or span that exceeds the available length
    pub fn span_too_long(span: usize, length: usize) -> Self {
        Self::SpanTooLong { span, length }
    }

    /// Create an error for a filter family missing one of its parameters
    pub fn missing_parameter(family: &str, parameter: &str) -> Self {
        Self::MissingParameter {
            family: family.to_string(),
            parameter: parameter.to_string(),
        }
    }
}
