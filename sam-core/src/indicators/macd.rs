//! MACD: difference of a fast and a slow recursive EWMA of close, plus a
//! smoothed signal line of that difference.
//!
//! Two series (separate Indicator instances):
//! - Line:   EWMA(close, fast) - EWMA(close, slow).   Lookback: slow - 1.
//! - Signal: EWMA(line, signal).                       Lookback: slow + signal - 2.
//!
//! Both recursions run from the first bar; only the output is masked, so the
//! values past warmup match an unmasked computation exactly.

use super::ewma::{ewma_of_series, mask_prefix, EwmaMode};
use super::{closes, Indicator};
use crate::domain::PriceBar;

/// Which MACD series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Line,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdLine::Line)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdLine::Signal)
    }

    fn build(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1, "MACD fast span must be >= 1");
        assert!(slow >= 1, "MACD slow span must be >= 1");
        assert!(signal >= 1, "MACD signal span must be >= 1");
        Self {
            fast,
            slow,
            signal,
            line,
            name: Self::key(fast, slow, signal, line),
        }
    }

    /// Lookup name for one of the MACD series.
    pub fn key(fast: usize, slow: usize, signal: usize, line: MacdLine) -> String {
        match line {
            MacdLine::Line => format!("macd_{fast}_{slow}_{signal}"),
            MacdLine::Signal => format!("macd_signal_{fast}_{slow}_{signal}"),
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let line_lookback = self.fast.max(self.slow) - 1;
        match self.line {
            MacdLine::Line => line_lookback,
            MacdLine::Signal => line_lookback + self.signal - 1,
        }
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes = closes(bars);
        let fast = ewma_of_series(&closes, self.fast, EwmaMode::Recursive);
        let slow = ewma_of_series(&closes, self.slow, EwmaMode::Recursive);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

        let mut result = match self.line {
            MacdLine::Line => line,
            MacdLine::Signal => ewma_of_series(&line, self.signal, EwmaMode::Recursive),
        };
        mask_prefix(&mut result, self.lookback());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn macd_of_constant_is_zero() {
        let bars = make_bars(&[50.0; 40]);
        let line = Macd::line(12, 26, 9).compute(&bars);
        let signal = Macd::signal(12, 26, 9).compute(&bars);
        assert!(line[24].is_nan());
        assert_approx(line[25], 0.0, DEFAULT_EPSILON);
        assert!(signal[32].is_nan());
        assert_approx(signal[33], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn macd_small_spans_known_values() {
        // fast span 1 → EWMA = close; slow span 3 → alpha 0.5 seeded at 10
        // slow: 10, 10.5, 11.25 ; line: 0, 0.5, 0.75
        // signal span 1 → equals line
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let line = Macd::line(1, 3, 1).compute(&bars);
        let signal = Macd::signal(1, 3, 1).compute(&bars);
        assert!(line[1].is_nan());
        assert_approx(line[2], 0.75, DEFAULT_EPSILON);
        assert_approx(signal[2], 0.75, DEFAULT_EPSILON);
    }

    #[test]
    fn rising_prices_put_line_above_zero() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let line = Macd::line(12, 26, 9).compute(&bars);
        assert!(line[59] > 0.0);
    }

    #[test]
    fn lookbacks_and_keys() {
        assert_eq!(Macd::line(12, 26, 9).lookback(), 25);
        assert_eq!(Macd::signal(12, 26, 9).lookback(), 33);
        assert_eq!(Macd::line(12, 26, 9).name(), "macd_12_26_9");
        assert_eq!(Macd::signal(12, 26, 9).name(), "macd_signal_12_26_9");
    }
}
