//! Simple moving average of closes, plus the series-level rolling mean that
//! the range mean and the composite trend line are built on.

use super::{closes, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window,
            name: Self::key(window),
        }
    }

    pub fn key(window: usize) -> String {
        format!("sma_{window}")
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        sma_of_series(&closes(bars), self.window)
    }
}

/// Rolling mean over `window` values.
///
/// Output `i` is defined only when the `window` inputs ending at `i` are all
/// defined; a NaN restarts the run, so an upstream warmup prefix shifts the
/// first defined mean by `window - 1` bars.
pub fn sma_of_series(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }

    let mut sum = 0.0;
    // consecutive defined inputs ending at i
    let mut run = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            sum = 0.0;
            run = 0;
            continue;
        }
        sum += v;
        run += 1;
        if run > window {
            sum -= values[i - window];
        }
        if run >= window {
            out[i] = sum / window as f64;
        }
    }
    out
}
