//! Bar range (high - low) and its rolling mean.
//!
//! - Range:     high[t] - low[t].      Lookback: 0.
//! - RangeMean: SMA(range, period).    Lookback: period - 1.

use super::sma::sma_of_series;
use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone, Default)]
pub struct Range;

impl Range {
    pub const KEY: &'static str = "range";
}

impl Indicator for Range {
    fn name(&self) -> &str {
        Self::KEY
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        bars.iter().map(PriceBar::range).collect()
    }
}

#[derive(Debug, Clone)]
pub struct RangeMean {
    period: usize,
    name: String,
}

impl RangeMean {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "range mean period must be >= 1");
        Self {
            period,
            name: Self::key(period),
        }
    }

    pub fn key(period: usize) -> String {
        format!("range_mean_{period}")
    }
}

impl Indicator for RangeMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        sma_of_series(&Range.compute(bars), self.period)
    }
}
