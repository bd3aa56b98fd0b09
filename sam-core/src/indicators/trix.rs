//! TRIX-style momentum: adjusted EWMA of one-bar percentage change.
//!
//! TRIX[t] = EWMA_adj(pct_change(close, 1), span)[t]
//! Lookback: span (one bar for the first change, span - 1 for warmup).

use super::ewma::{ewma_of_series, mask_prefix, EwmaMode};
use super::pct_change::pct_change_of_series;
use super::{closes, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Trix {
    span: usize,
    name: String,
}

impl Trix {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "TRIX span must be >= 1");
        Self {
            span,
            name: Self::key(span),
        }
    }

    pub fn key(span: usize) -> String {
        format!("trix_{span}")
    }
}

impl Indicator for Trix {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.span
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let pct = pct_change_of_series(&closes(bars), 1);
        let mut result = ewma_of_series(&pct, self.span, EwmaMode::Adjusted);
        mask_prefix(&mut result, self.lookback());
        result
    }
}
