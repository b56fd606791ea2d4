//! Globally fitted smoothers
//!
//! Families that are not a fixed convolution: weighted mean, linear and
//! polynomial least squares, the Hodrick-Prescott filter and a cubic
//! smoothing spline. Missing observations enter every fit with zero weight,
//! so the fitted curve is defined at every position.

use crate::weights::KernelSpec;
use nalgebra::{DMatrix, DVector};
use tracing::debug;
use x11_core::{is_missing, ComputePrimitives, Error, Result};

/// Fit an analytic family to `y`
pub fn fit<P: ComputePrimitives>(primitives: &P, spec: &KernelSpec, y: &[f64]) -> Result<Vec<f64>> {
    if y.is_empty() {
        return Ok(Vec::new());
    }
    match spec {
        KernelSpec::Mean => weighted_mean(primitives, y),
        KernelSpec::Linear => polynomial(primitives, y, 1),
        KernelSpec::Polynomial { degree } => polynomial(primitives, y, *degree),
        KernelSpec::HodrickPrescott { lambda } => hodrick_prescott(y, *lambda),
        KernelSpec::SmoothingSpline { lambda } => smoothing_spline(y, *lambda),
        other => Err(Error::InvalidParameter(format!(
            "{} is a convolution filter, not an analytic fit",
            other.family()
        ))),
    }
}

/// Observation weights (1 present, 0 missing) and values with gaps zeroed
fn observation_weights(y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let weights: Vec<f64> = y.iter().map(|&v| if is_missing(v) { 0.0 } else { 1.0 }).collect();
    if weights.iter().all(|&w| w == 0.0) {
        return Err(Error::InvalidInput(
            "cannot fit a smoother to a series with no observed values".to_string(),
        ));
    }
    let values = y.iter().map(|&v| if is_missing(v) { 0.0 } else { v }).collect();
    Ok((weights, values))
}

/// Constant fit at the mean of the observed values
pub fn weighted_mean<P: ComputePrimitives>(primitives: &P, y: &[f64]) -> Result<Vec<f64>> {
    let (weights, values) = observation_weights(y)?;
    let mean = primitives.dot_product(&weights, &values) / primitives.sum(&weights);
    Ok(vec![mean; y.len()])
}

/// Least-squares polynomial of the given degree, evaluated at every index
///
/// Abscissae are rescaled to [-1, 1] to keep the normal equations well
/// conditioned.
pub fn polynomial<P: ComputePrimitives>(primitives: &P, y: &[f64], degree: usize) -> Result<Vec<f64>> {
    let (weights, values) = observation_weights(y)?;
    let n = y.len();
    let observed = weights.iter().filter(|&&w| w > 0.0).count();
    if observed < degree + 1 {
        return Err(Error::InsufficientData {
            expected: degree + 1,
            actual: observed,
        });
    }

    let x: Vec<f64> = if n == 1 {
        vec![0.0]
    } else {
        (0..n).map(|i| 2.0 * i as f64 / (n - 1) as f64 - 1.0).collect()
    };

    // Columns of the design matrix: x^0 .. x^degree, zeroed at missing rows
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(degree + 1);
    let mut power = weights.clone();
    for _ in 0..=degree {
        columns.push(power.clone());
        power = power.iter().zip(&x).map(|(p, xi)| p * xi).collect();
    }

    let mut xtx = DMatrix::zeros(degree + 1, degree + 1);
    let mut xty = DVector::zeros(degree + 1);
    for i in 0..=degree {
        for j in 0..=degree {
            xtx[(i, j)] = primitives.dot_product(&columns[i], &columns[j]);
        }
        xty[i] = primitives.dot_product(&columns[i], &values);
    }

    let coeffs = match xtx.clone().cholesky() {
        Some(chol) => chol.solve(&xty),
        None => {
            debug!("polynomial normal equations not positive definite, using SVD");
            xtx.svd(true, true)
                .solve(&xty, 1e-10)
                .map_err(|_| Error::Computation("Failed to solve polynomial system".to_string()))?
        }
    };

    Ok(x
        .iter()
        .map(|&xi| coeffs.iter().rev().fold(0.0, |acc, &c| acc * xi + c))
        .collect())
}

/// Hodrick-Prescott trend: solves `(W + λ DᵀD) τ = W y`
///
/// `D` is the `(n-2) × n` second-difference operator; its first and last
/// rows give the boundary corrections of the banded system.
pub fn hodrick_prescott(y: &[f64], lambda: f64) -> Result<Vec<f64>> {
    let (weights, values) = observation_weights(y)?;
    let n = y.len();
    let mut a = DMatrix::from_diagonal(&DVector::from_vec(weights.clone()));
    const SECOND_DIFF: [f64; 3] = [1.0, -2.0, 1.0];
    for k in 0..n.saturating_sub(2) {
        for (i, ci) in SECOND_DIFF.iter().enumerate() {
            for (j, cj) in SECOND_DIFF.iter().enumerate() {
                a[(k + i, k + j)] += lambda * ci * cj;
            }
        }
    }
    let rhs = DVector::from_iterator(n, weights.iter().zip(&values).map(|(w, v)| w * v));
    solve_symmetric(a, rhs, "Hodrick-Prescott")
}

/// Cubic smoothing spline on unit-spaced knots (Reinsch form)
///
/// Solves `(W + λ Q R⁻¹ Qᵀ) f = W y`, where `Q` holds second divided
/// differences and `R` is the tridiagonal (2/3, 1/6) band.
pub fn smoothing_spline(y: &[f64], lambda: f64) -> Result<Vec<f64>> {
    let (weights, values) = observation_weights(y)?;
    let n = y.len();
    let mut a = DMatrix::from_diagonal(&DVector::from_vec(weights.clone()));

    if n >= 3 {
        let m = n - 2;
        let mut q = DMatrix::zeros(n, m);
        let mut r = DMatrix::zeros(m, m);
        for k in 0..m {
            q[(k, k)] = 1.0;
            q[(k + 1, k)] = -2.0;
            q[(k + 2, k)] = 1.0;
            r[(k, k)] = 2.0 / 3.0;
            if k + 1 < m {
                r[(k, k + 1)] = 1.0 / 6.0;
                r[(k + 1, k)] = 1.0 / 6.0;
            }
        }
        let r_chol = r
            .cholesky()
            .ok_or_else(|| Error::Computation("spline band matrix is singular".to_string()))?;
        let r_inv_qt = r_chol.solve(&q.transpose());
        a += (&q * r_inv_qt) * lambda;
    }

    let rhs = DVector::from_iterator(n, weights.iter().zip(&values).map(|(w, v)| w * v));
    solve_symmetric(a, rhs, "smoothing spline")
}

fn solve_symmetric(a: DMatrix<f64>, rhs: DVector<f64>, what: &str) -> Result<Vec<f64>> {
    if let Some(chol) = a.clone().cholesky() {
        return Ok(chol.solve(&rhs).as_slice().to_vec());
    }
    debug!("{what} system not positive definite, falling back to LU");
    a.lu()
        .solve(&rhs)
        .map(|v| v.as_slice().to_vec())
        .ok_or_else(|| Error::Computation(format!("{what} system is singular")))
}
