//! Edge padding for centred filters
//!
//! A series is extended by `half_width` points on each side before a
//! convolution pass, so that every original position has a full window,
//! and the padding is trimmed off afterwards.

use num_traits::Float;
use serde::{Deserialize, Serialize};
use x11_core::{Error, Result};

/// How the series is extended past its ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeMode {
    /// Reverse the first/last `h` observations and attach them outside the ends
    #[default]
    Mirror,
    /// Repeat the first/last observation `h` times
    Extend,
}

/// Edge mode plus padding half-width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgePolicy {
    pub mode: EdgeMode,
    pub half_width: usize,
}

impl EdgePolicy {
    pub fn new(mode: EdgeMode, half_width: usize) -> Self {
        Self { mode, half_width }
    }

    pub fn mirror(half_width: usize) -> Self {
        Self::new(EdgeMode::Mirror, half_width)
    }

    pub fn extend(half_width: usize) -> Self {
        Self::new(EdgeMode::Extend, half_width)
    }
}

/// Pad `series` on both sides according to `policy`
///
/// Mirroring repeats the edge observation itself: `[a, b, c]` mirrored by 2
/// becomes `[b, a, a, b, c, c, b]`.
pub fn pad<T: Float>(series: &[T], policy: EdgePolicy) -> Result<Vec<T>> {
    let n = series.len();
    let h = policy.half_width;
    if h > n {
        return Err(Error::span_too_long(h, n));
    }
    if h == 0 {
        return Ok(series.to_vec());
    }

    let mut padded = Vec::with_capacity(n + 2 * h);
    match policy.mode {
        EdgeMode::Mirror => {
            padded.extend(series[..h].iter().rev());
            padded.extend_from_slice(series);
            padded.extend(series[n - h..].iter().rev());
        }
        EdgeMode::Extend => {
            padded.extend(std::iter::repeat(series[0]).take(h));
            padded.extend_from_slice(series);
            padded.extend(std::iter::repeat(series[n - 1]).take(h));
        }
    }
    Ok(padded)
}

/// Remove `half_width` points from both ends
pub fn trim<T: Copy>(padded: &[T], half_width: usize) -> Vec<T> {
    if padded.len() < 2 * half_width {
        return Vec::new();
    }
    padded[half_width..padded.len() - half_width].to_vec()
}
