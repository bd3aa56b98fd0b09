//! PriceBar: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLC(V) bar for a single instrument at a single timestamp.
///
/// Bars are consumed read-only. Validation against the series invariants
/// (strictly increasing timestamps, well-formed prices) happens once in
/// [`PriceSeries::new`](super::PriceSeries::new).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl PriceBar {
    pub fn new(timestamp: NaiveDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Returns true if any OHLC field is NaN or infinite, or the range is inverted.
    ///
    /// Such a bar would fabricate comparisons downstream, so it is never
    /// coerced to a value; the malformed-bar policy decides whether it is
    /// skipped or rejected.
    pub fn is_malformed(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
            || self.high < self.low
    }

    /// Flat bar: open == close and high == low. Valid input, scored like any other.
    pub fn is_degenerate(&self) -> bool {
        self.open == self.close && self.high == self.low
    }

    /// Close strictly above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close strictly below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// High minus low.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
