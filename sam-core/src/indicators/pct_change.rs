//! Percentage change of close over `lag` bars, as a fraction.
//!
//! PCT[t] = (close[t] - close[t-lag]) / close[t-lag]
//! Lookback: lag. Undefined when the reference close is zero.

use super::{closes, shifted, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct PctChange {
    lag: usize,
    name: String,
}

impl PctChange {
    pub fn new(lag: usize) -> Self {
        assert!(lag >= 1, "pct change lag must be >= 1");
        Self {
            lag,
            name: Self::key(lag),
        }
    }

    pub fn key(lag: usize) -> String {
        format!("pct_change_{lag}")
    }
}

impl Indicator for PctChange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.lag
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        pct_change_of_series(&closes(bars), self.lag)
    }
}

/// Fractional change against the value `lag` bars earlier. NaN inputs and a
/// zero reference give NaN.
pub fn pct_change_of_series(values: &[f64], lag: usize) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, &curr)| {
            let prev = shifted(values, i, lag);
            if prev == 0.0 {
                f64::NAN
            } else {
                (curr - prev) / prev
            }
        })
        .collect()
}
