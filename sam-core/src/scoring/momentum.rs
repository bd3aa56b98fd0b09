//! Momentum scorer: MACD line against its signal line.
//!
//! A cross on the current bar outranks a plain above/below reading:
//! cross up +1.0, above +0.5, cross down -1.0, below -0.5, equal 0.

use serde::{Deserialize, Serialize};

use super::rules::{Rule, RuleTable};
use super::ComponentScorer;
use crate::config::ConfigError;
use crate::features::FeatureSet;
use crate::indicators::{Indicator, Macd, MacdLine};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl MomentumParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("momentum.fast", self.fast),
            ("momentum.slow", self.slow),
            ("momentum.signal", self.signal),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroWindow { field });
            }
        }
        if self.fast >= self.slow {
            return Err(ConfigError::InvalidParameter {
                field: "momentum.fast",
                reason: format!("fast span {} must be shorter than slow span {}", self.fast, self.slow),
            });
        }
        Ok(())
    }
}

struct MacdContext {
    line: f64,
    signal: f64,
    prev_line: f64,
    prev_signal: f64,
}

const MOMENTUM_RULES: &[Rule<MacdContext>] = &[
    Rule {
        name: "cross_up",
        value: 1.0,
        when: |c| c.line > c.signal && c.prev_line <= c.prev_signal,
    },
    Rule {
        name: "above",
        value: 0.5,
        when: |c| c.line > c.signal,
    },
    Rule {
        name: "cross_down",
        value: -1.0,
        when: |c| c.line < c.signal && c.prev_line >= c.prev_signal,
    },
    Rule {
        name: "below",
        value: -0.5,
        when: |c| c.line < c.signal,
    },
];

const MOMENTUM_TABLE: RuleTable<MacdContext> = RuleTable::new(MOMENTUM_RULES);

#[derive(Debug, Clone)]
pub struct MomentumScorer {
    params: MomentumParams,
    line_key: String,
    signal_key: String,
}

impl MomentumScorer {
    pub fn new(params: MomentumParams) -> Self {
        let MomentumParams { fast, slow, signal } = params;
        Self {
            line_key: Macd::key(fast, slow, signal, MacdLine::Line),
            signal_key: Macd::key(fast, slow, signal, MacdLine::Signal),
            params,
        }
    }
}

impl ComponentScorer for MomentumScorer {
    fn name(&self) -> &str {
        "momentum"
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        let MomentumParams { fast, slow, signal } = self.params;
        vec![
            Box::new(Macd::line(fast, slow, signal)),
            Box::new(Macd::signal(fast, slow, signal)),
        ]
    }

    fn warmup_bars(&self) -> usize {
        // signal line warmup, plus one bar to detect a cross
        let MomentumParams { fast, slow, signal } = self.params;
        Macd::signal(fast, slow, signal).lookback() + 1
    }

    fn bounds(&self) -> (f64, f64) {
        MOMENTUM_TABLE.bounds()
    }

    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64> {
        let ctx = MacdContext {
            line: features.defined(&self.line_key, bar_index)?,
            signal: features.defined(&self.signal_key, bar_index)?,
            prev_line: features.lagged(&self.line_key, bar_index, 1)?,
            prev_signal: features.lagged(&self.signal_key, bar_index, 1)?,
        };
        Some(MOMENTUM_TABLE.score(&ctx))
    }
}
