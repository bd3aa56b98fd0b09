//! Rolling standard deviation of one-bar percentage change.
//!
//! Sample standard deviation (divide by N - 1) over `period` percentage
//! changes. The first percentage change is itself undefined.
//! Lookback: period.

use super::pct_change::pct_change_of_series;
use super::{closes, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
    name: String,
}

impl StdDev {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "sample stddev period must be >= 2");
        Self {
            period,
            name: Self::key(period),
        }
    }

    pub fn key(period: usize) -> String {
        format!("pct_std_{period}")
    }
}

impl Indicator for StdDev {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        std_of_series(&pct_change_of_series(&closes(bars), 1), self.period)
    }
}

/// Rolling sample standard deviation; NaN anywhere in the window → NaN.
pub fn std_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period < 2 || n < period {
        return result;
    }

    for t in (period - 1)..n {
        let window = &values[(t + 1 - period)..=t];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = window.iter().sum::<f64>() / period as f64;
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        result[t] = var.sqrt();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sample_std_known_value() {
        // 2, 4, 4, 4, 5, 5, 7, 9 → sample variance 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let result = std_of_series(&values, 8);
        assert_approx(result[7], (32.0_f64 / 7.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn constant_growth_has_zero_std() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let bars = make_bars(&closes);
        let result = StdDev::new(3).compute(&bars);
        // pct change undefined at 0, so first full window ends at index 3
        assert!(result[2].is_nan());
        assert_approx(result[3], 0.0, 1e-12);
        assert_approx(result[9], 0.0, 1e-12);
    }

    #[test]
    fn lookback_counts_pct_change() {
        assert_eq!(StdDev::new(20).lookback(), 20);
    }
}
