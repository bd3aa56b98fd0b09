//! Feature extraction.
//!
//! All indicator series a run needs are computed once, up front, from the
//! validated price series and stored by name in a [`FeatureSet`]. Scorers then
//! read features by bar index; nothing is recomputed per bar.

pub mod candle;

pub use candle::CandleFlags;

use std::collections::HashMap;

use rayon::prelude::*;

use crate::domain::PriceBar;
use crate::indicators::Indicator;

/// Precomputed feature series for one price series.
///
/// Built once before scoring, then queried by bar index. Every series has
/// the same length as the input bars.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    series: HashMap<String, Vec<f64>>,
    candles: CandleFlags,
    closes: Vec<f64>,
}

impl FeatureSet {
    pub fn new(bars: &[PriceBar]) -> Self {
        Self {
            series: HashMap::new(),
            candles: CandleFlags::new(bars),
            closes: bars.iter().map(|b| b.close).collect(),
        }
    }

    /// Insert a named feature series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Raw value at a bar index (may be NaN during warmup).
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Value at a bar index, `None` if missing or undefined.
    pub fn defined(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.get(name, bar_index).filter(|v| !v.is_nan())
    }

    /// Value `lag` bars before `bar_index`, `None` if that is before the start
    /// or undefined.
    pub fn lagged(&self, name: &str, bar_index: usize, lag: usize) -> Option<f64> {
        self.defined(name, bar_index.checked_sub(lag)?)
    }

    /// Full series for a named feature.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn candles(&self) -> &CandleFlags {
        &self.candles
    }

    pub fn close(&self, bar_index: usize) -> Option<f64> {
        self.closes.get(bar_index).copied()
    }

    /// Number of bars the features are aligned to.
    pub fn bar_count(&self) -> usize {
        self.closes.len()
    }

    /// Number of named feature series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Compute every indicator over the bars and collect them into a `FeatureSet`.
///
/// Indicators are independent of each other and each reads only bars at or
/// before its output index, so they are computed in parallel.
pub fn extract_features(bars: &[PriceBar], indicators: &[Box<dyn Indicator>]) -> FeatureSet {
    let computed: Vec<(String, Vec<f64>)> = indicators
        .par_iter()
        .map(|indicator| {
            let series = indicator.compute(bars);
            debug_assert_eq!(
                series.len(),
                bars.len(),
                "indicator '{}' produced {} values for {} bars",
                indicator.name(),
                series.len(),
                bars.len(),
            );
            (indicator.name().to_string(), series)
        })
        .collect();

    let mut features = FeatureSet::new(bars);
    for (name, series) in computed {
        features.insert(name, series);
    }
    features
}
