//! Trend-cross scorer: direction of a fast WMA combined with its position
//! relative to a slow WMA.
//!
//! | fast rising | fast above slow | score |
//! |-------------|-----------------|-------|
//! | yes         | yes             | +0.50 |
//! | yes         | no              | +0.25 |
//! | no          | yes             | -0.50 |
//! | no          | no              | -0.75 |

use serde::{Deserialize, Serialize};

use super::rules::{Rule, RuleTable};
use super::ComponentScorer;
use crate::config::ConfigError;
use crate::features::FeatureSet;
use crate::indicators::{Indicator, Wma};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendCrossParams {
    pub fast: usize,
    pub slow: usize,
}

impl Default for TrendCrossParams {
    fn default() -> Self {
        Self { fast: 6, slow: 80 }
    }
}

impl TrendCrossParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fast == 0 {
            return Err(ConfigError::ZeroWindow {
                field: "trend_cross.fast",
            });
        }
        if self.slow == 0 {
            return Err(ConfigError::ZeroWindow {
                field: "trend_cross.slow",
            });
        }
        Ok(())
    }
}

struct CrossContext {
    rising: bool,
    above: bool,
}

const CROSS_RULES: &[Rule<CrossContext>] = &[
    Rule {
        name: "rising_above",
        value: 0.5,
        when: |c| c.rising && c.above,
    },
    Rule {
        name: "rising_below",
        value: 0.25,
        when: |c| c.rising && !c.above,
    },
    Rule {
        name: "falling_above",
        value: -0.5,
        when: |c| !c.rising && c.above,
    },
    Rule {
        name: "falling_below",
        value: -0.75,
        when: |c| !c.rising && !c.above,
    },
];

const CROSS_TABLE: RuleTable<CrossContext> = RuleTable::new(CROSS_RULES);

#[derive(Debug, Clone)]
pub struct TrendCrossScorer {
    params: TrendCrossParams,
    fast_key: String,
    slow_key: String,
}

impl TrendCrossScorer {
    pub fn new(params: TrendCrossParams) -> Self {
        Self {
            fast_key: Wma::key(params.fast),
            slow_key: Wma::key(params.slow),
            params,
        }
    }
}

impl ComponentScorer for TrendCrossScorer {
    fn name(&self) -> &str {
        "trend_cross"
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Wma::new(self.params.fast)),
            Box::new(Wma::new(self.params.slow)),
        ]
    }

    fn warmup_bars(&self) -> usize {
        self.params.fast.max(self.params.slow.saturating_sub(1))
    }

    fn bounds(&self) -> (f64, f64) {
        CROSS_TABLE.bounds()
    }

    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64> {
        let fast = features.defined(&self.fast_key, bar_index)?;
        let prev = features.lagged(&self.fast_key, bar_index, 1)?;
        let slow = features.defined(&self.slow_key, bar_index)?;
        let ctx = CrossContext {
            rising: fast > prev,
            above: fast > slow,
        };
        Some(CROSS_TABLE.score(&ctx))
    }
}
