//! Feature indicators.
//!
//! Every indicator is a pure, backward-looking function of the bar history and
//! implements [`Indicator`]. Series are computed once per run by the feature
//! extractor and looked up by name by the component scorers.
//!
//! Multi-series indicators (MACD line and signal) are exposed as separate
//! named instances, keeping the single-series trait unchanged.

pub mod ewma;
pub mod macd;
pub mod pct_change;
pub mod range;
pub mod sma;
pub mod stddev;
pub mod trix;
pub mod wma;

pub use ewma::{ewma_of_series, Ewma, EwmaMode};
pub use macd::{Macd, MacdLine};
pub use pct_change::PctChange;
pub use range::{Range, RangeMean};
pub use sma::{sma_of_series, Sma};
pub use stddev::StdDev;
pub use trix::Trix;
pub use wma::{wma_of_series, Wma};

use crate::domain::PriceBar;

/// Trait for feature indicators.
///
/// An indicator takes the full bar series and produces a numeric series of the
/// same length. The first `lookback()` values are `f64::NAN` (undefined, never
/// a fabricated zero), and any window containing an undefined input is
/// undefined too.
///
/// # Look-ahead guard
/// No value at bar t may depend on bar t+1 or later. Every indicator must pass
/// the truncated-vs-full series test in `tests/lookahead_test.rs`.
pub trait Indicator: Send + Sync {
    /// Stable lookup name (e.g. "wma_18", "macd_signal_12_26_9").
    fn name(&self) -> &str;

    /// Number of leading bars that are undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the entire series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Extract closes as a plain series for the `*_of_series` helpers.
pub(crate) fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Value `lag` bars before `i`, or NaN when that precedes the series start.
pub fn shifted(values: &[f64], i: usize, lag: usize) -> f64 {
    if i < lag {
        return f64::NAN;
    }
    values.get(i - lag).copied().unwrap_or(f64::NAN)
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLC: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            PriceBar::new(base + chrono::Duration::days(i as i64), open, high, low, close)
                .with_volume(1000.0)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
