//! Volatility scorer: flags bars whose high-low range is wide relative to the
//! recent average range, signed by the direction of the bar body.

use serde::{Deserialize, Serialize};

use super::rules::{Rule, RuleTable};
use super::ComponentScorer;
use crate::config::ConfigError;
use crate::features::FeatureSet;
use crate::indicators::{Indicator, Range, RangeMean};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityParams {
    pub window: usize,
    pub factor: f64,
}

impl Default for VolatilityParams {
    fn default() -> Self {
        Self {
            window: 14,
            factor: 1.5,
        }
    }
}

impl VolatilityParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow {
                field: "volatility.window",
            });
        }
        if !self.factor.is_finite() || self.factor <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                field: "volatility.factor",
                reason: format!("must be a finite value > 0, got {}", self.factor),
            });
        }
        Ok(())
    }
}

struct RangeContext {
    wide: bool,
    bullish: bool,
    bearish: bool,
}

const VOLATILITY_RULES: &[Rule<RangeContext>] = &[
    Rule {
        name: "wide_bullish",
        value: 0.5,
        when: |c| c.wide && c.bullish,
    },
    Rule {
        name: "wide_bearish",
        value: -0.5,
        when: |c| c.wide && c.bearish,
    },
];

const VOLATILITY_TABLE: RuleTable<RangeContext> = RuleTable::new(VOLATILITY_RULES);

#[derive(Debug, Clone)]
pub struct VolatilityScorer {
    params: VolatilityParams,
    mean_key: String,
}

impl VolatilityScorer {
    pub fn new(params: VolatilityParams) -> Self {
        Self {
            mean_key: RangeMean::key(params.window),
            params,
        }
    }
}

impl ComponentScorer for VolatilityScorer {
    fn name(&self) -> &str {
        "volatility"
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Range), Box::new(RangeMean::new(self.params.window))]
    }

    fn warmup_bars(&self) -> usize {
        self.params.window.saturating_sub(1)
    }

    fn bounds(&self) -> (f64, f64) {
        VOLATILITY_TABLE.bounds()
    }

    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64> {
        let range = features.defined(Range::KEY, bar_index)?;
        let mean = features.defined(&self.mean_key, bar_index)?;
        let candles = features.candles();
        let ctx = RangeContext {
            wide: range > self.params.factor * mean,
            bullish: candles.bullish_body(bar_index, 0)?,
            bearish: candles.bearish_body(bar_index, 0)?,
        };
        Some(VOLATILITY_TABLE.score(&ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceBar;
    use crate::features::extract_features;

    fn bar(day: i64, open: f64, high: f64, low: f64, close: f64) -> PriceBar {
        let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        PriceBar::new(base + chrono::Duration::days(day), open, high, low, close)
    }

    fn scorer() -> VolatilityScorer {
        VolatilityScorer::new(VolatilityParams {
            window: 3,
            factor: 1.5,
        })
    }

    fn scores(bars: &[PriceBar]) -> Vec<Option<f64>> {
        let s = scorer();
        let features = extract_features(bars, &s.required_indicators());
        (0..bars.len()).map(|i| s.score_bar(&features, i)).collect()
    }

    #[test]
    fn wide_green_bar_scores_positive() {
        let bars = vec![
            bar(0, 10.0, 11.0, 10.0, 10.5),
            bar(1, 10.5, 11.5, 10.5, 11.0),
            // range 10 vs mean (1 + 1 + 10) / 3 = 4
            bar(2, 11.0, 20.0, 10.0, 19.0),
        ];
        let s = scores(&bars);
        assert_eq!(&s[..2], &[None, None]);
        assert_eq!(s[2], Some(0.5));
    }

    #[test]
    fn wide_red_bar_scores_negative() {
        let bars = vec![
            bar(0, 10.0, 11.0, 10.0, 10.5),
            bar(1, 10.5, 11.5, 10.5, 11.0),
            bar(2, 19.0, 20.0, 10.0, 11.0),
        ];
        assert_eq!(scores(&bars)[2], Some(-0.5));
    }

    #[test]
    fn ordinary_range_scores_zero() {
        let bars = vec![
            bar(0, 10.0, 11.0, 10.0, 10.5),
            bar(1, 10.5, 11.5, 10.5, 11.0),
            bar(2, 11.0, 12.0, 11.0, 11.5),
        ];
        assert_eq!(scores(&bars)[2], Some(0.0));
    }

    #[test]
    fn wide_doji_scores_zero() {
        let bars = vec![
            bar(0, 10.0, 11.0, 10.0, 10.5),
            bar(1, 10.5, 11.5, 10.5, 11.0),
            bar(2, 15.0, 20.0, 10.0, 15.0),
        ];
        assert_eq!(scores(&bars)[2], Some(0.0));
    }

    #[test]
    fn rejects_non_positive_factor() {
        let p = VolatilityParams {
            factor: 0.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }
}
