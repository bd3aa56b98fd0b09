//! Weighted Moving Average (WMA).
//!
//! Linear weights 1..=period, newest bar heaviest:
//! WMA[t] = Σ_{k=1..p} k · close[t-p+k] / Σ k
//! Lookback: period - 1.

use super::{closes, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
    name: String,
}

impl Wma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "WMA period must be >= 1");
        Self {
            period,
            name: format!("wma_{period}"),
        }
    }

    /// Lookup name for a WMA of the given period.
    pub fn key(period: usize) -> String {
        format!("wma_{period}")
    }
}

impl Indicator for Wma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        wma_of_series(&closes(bars), self.period)
    }
}

/// Linearly weighted rolling mean of an arbitrary series.
///
/// Each window is summed directly (oldest to newest) so the result at index
/// `t` depends only on the window contents, never on earlier running state.
pub fn wma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let denom = (period * (period + 1)) as f64 / 2.0;

    for t in (period - 1)..n {
        let window = &values[(t + 1 - period)..=t];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let weighted: f64 = window
            .iter()
            .enumerate()
            .map(|(k, v)| (k + 1) as f64 * v)
            .sum();
        result[t] = weighted / denom;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn wma_3_known_values() {
        // weights 1,2,3 / 6
        // WMA[2] = (1*10 + 2*11 + 3*12) / 6 = 68/6
        // WMA[3] = (1*11 + 2*12 + 3*13) / 6 = 74/6
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = Wma::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 68.0 / 6.0, DEFAULT_EPSILON);
        assert_approx(result[3], 74.0 / 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wma_of_constant_is_constant() {
        let result = wma_of_series(&[5.0; 10], 4);
        for v in &result[3..] {
            assert_approx(*v, 5.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn wma_weights_recent_more_than_sma() {
        // Rising series: WMA sits above SMA.
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let wma = wma_of_series(&values, 5);
        let sma = crate::indicators::sma_of_series(&values, 5);
        assert!(wma[9] > sma[9]);
    }

    #[test]
    fn wma_nan_in_window() {
        let values = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let result = wma_of_series(&values, 2);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(!result[3].is_nan());
    }

    #[test]
    fn wma_lookback_and_key() {
        assert_eq!(Wma::new(18).lookback(), 17);
        assert_eq!(Wma::new(18).name(), Wma::key(18));
    }
}
