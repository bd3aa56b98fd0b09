//! Lagged candle comparisons.
//!
//! Two families of per-bar booleans, queried at a lag relative to bar `i`:
//! - body:  close[i-lag] vs open[i-lag]
//! - close: close[i-lag] vs close[i-lag-1]
//!
//! A comparison that would need a bar before the series start is `None`, not
//! `false`, so the scorer can tell "no history" from "condition failed".

use crate::domain::PriceBar;

#[derive(Debug, Clone, Default)]
pub struct CandleFlags {
    closes: Vec<f64>,
    bullish: Vec<bool>,
    bearish: Vec<bool>,
}

impl CandleFlags {
    pub fn new(bars: &[PriceBar]) -> Self {
        Self {
            closes: bars.iter().map(|b| b.close).collect(),
            bullish: bars.iter().map(PriceBar::is_bullish).collect(),
            bearish: bars.iter().map(PriceBar::is_bearish).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// close > open, `lag` bars back.
    pub fn bullish_body(&self, i: usize, lag: usize) -> Option<bool> {
        let j = self.index(i, lag)?;
        Some(self.bullish[j])
    }

    /// close < open, `lag` bars back.
    pub fn bearish_body(&self, i: usize, lag: usize) -> Option<bool> {
        let j = self.index(i, lag)?;
        Some(self.bearish[j])
    }

    /// close above the previous close, `lag` bars back.
    pub fn close_up(&self, i: usize, lag: usize) -> Option<bool> {
        let j = self.index(i, lag)?;
        let prev = j.checked_sub(1)?;
        Some(self.closes[j] > self.closes[prev])
    }

    /// close below the previous close, `lag` bars back.
    pub fn close_down(&self, i: usize, lag: usize) -> Option<bool> {
        let j = self.index(i, lag)?;
        let prev = j.checked_sub(1)?;
        Some(self.closes[j] < self.closes[prev])
    }

    fn index(&self, i: usize, lag: usize) -> Option<usize> {
        if i >= self.closes.len() {
            return None;
        }
        i.checked_sub(lag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn body_flags_at_lags() {
        // make_bars: open = previous close
        // closes 10, 11, 10 → bodies: flat, up, down
        let flags = CandleFlags::new(&make_bars(&[10.0, 11.0, 10.0]));
        assert_eq!(flags.bullish_body(0, 0), Some(false));
        assert_eq!(flags.bearish_body(0, 0), Some(false));
        assert_eq!(flags.bullish_body(1, 0), Some(true));
        assert_eq!(flags.bearish_body(2, 0), Some(true));
        assert_eq!(flags.bullish_body(2, 1), Some(true));
        assert_eq!(flags.bullish_body(2, 3), None);
    }

    #[test]
    fn close_flags_need_a_prior_bar() {
        let flags = CandleFlags::new(&make_bars(&[10.0, 11.0, 10.0]));
        assert_eq!(flags.close_up(0, 0), None);
        assert_eq!(flags.close_up(1, 0), Some(true));
        assert_eq!(flags.close_down(2, 0), Some(true));
        assert_eq!(flags.close_up(2, 1), Some(true));
        assert_eq!(flags.close_up(2, 2), None);
    }

    #[test]
    fn out_of_range_is_none() {
        let flags = CandleFlags::new(&make_bars(&[10.0]));
        assert_eq!(flags.bullish_body(5, 0), None);
        assert_eq!(flags.len(), 1);
    }
}
