//! Growth scorer: compares a weighted moving average with its own value one
//! bar earlier, using a multiplicative threshold band.
//!
//! - wma > prev · (1 + t)  →  +0.5
//! - wma < prev / (1 + t)  →  -0.5
//! - otherwise             →   0

use serde::{Deserialize, Serialize};

use super::rules::{Rule, RuleTable};
use super::ComponentScorer;
use crate::config::ConfigError;
use crate::features::FeatureSet;
use crate::indicators::{Indicator, Wma};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    pub window: usize,
    pub threshold: f64,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            window: 18,
            threshold: 0.0015,
        }
    }
}

impl GrowthParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow {
                field: "growth.window",
            });
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::InvalidParameter {
                field: "growth.threshold",
                reason: format!("must be a finite value >= 0, got {}", self.threshold),
            });
        }
        Ok(())
    }
}

struct GrowthContext {
    wma: f64,
    prev: f64,
    factor: f64,
}

const GROWTH_RULES: &[Rule<GrowthContext>] = &[
    Rule {
        name: "rising",
        value: 0.5,
        when: |c| c.wma > c.prev * c.factor,
    },
    Rule {
        name: "falling",
        value: -0.5,
        when: |c| c.wma < c.prev / c.factor,
    },
];

const GROWTH_TABLE: RuleTable<GrowthContext> = RuleTable::new(GROWTH_RULES);

#[derive(Debug, Clone)]
pub struct GrowthScorer {
    params: GrowthParams,
    key: String,
}

impl GrowthScorer {
    pub fn new(params: GrowthParams) -> Self {
        let key = Wma::key(params.window);
        Self { params, key }
    }
}

impl ComponentScorer for GrowthScorer {
    fn name(&self) -> &str {
        "growth"
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Wma::new(self.params.window))]
    }

    fn warmup_bars(&self) -> usize {
        self.params.window
    }

    fn bounds(&self) -> (f64, f64) {
        GROWTH_TABLE.bounds()
    }

    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64> {
        let ctx = GrowthContext {
            wma: features.defined(&self.key, bar_index)?,
            prev: features.lagged(&self.key, bar_index, 1)?,
            factor: 1.0 + self.params.threshold,
        };
        Some(GROWTH_TABLE.score(&ctx))
    }
}
