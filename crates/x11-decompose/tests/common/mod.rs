//! Shared series generators for decomposition tests

#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn flat(len: usize, level: f64) -> Vec<f64> {
    vec![level; len]
}

/// `level + amplitude · sin(2πt / period)`
pub fn sinusoid(len: usize, period: usize, level: f64, amplitude: f64) -> Vec<f64> {
    (0..len)
        .map(|t| level + amplitude * (2.0 * PI * t as f64 / period as f64).sin())
        .collect()
}

/// Reproducible pseudo-noise in [-1, 1] without an RNG
pub fn hashed_noise(t: usize) -> f64 {
    let t = t as f64;
    (t * 12.9898).sin() * (t * 4.1414).cos()
}

/// Growing trend times a seasonal factor times a small noise factor
pub fn multiplicative_series(len: usize, period: usize) -> Vec<f64> {
    (0..len)
        .map(|t| {
            let phase = 2.0 * PI * t as f64 / period as f64;
            (100.0 + 0.5 * t as f64) * (1.0 + 0.1 * phase.sin()) * (1.0 + 0.02 * hashed_noise(t))
        })
        .collect()
}

/// Trend plus season plus seeded Gaussian noise
pub fn noisy_additive(len: usize, period: usize, sd: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, sd).expect("valid normal");
    (0..len)
        .map(|t| {
            let phase = 2.0 * PI * t as f64 / period as f64;
            50.0 + 0.3 * t as f64 + 5.0 * phase.cos() + noise.sample(&mut rng)
        })
        .collect()
}

pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |m, v| m.max(v.abs()))
}
