//! TRIX scorer: sign of the smoothed percentage change, strengthened when it
//! is still moving away from zero.

use serde::{Deserialize, Serialize};

use super::rules::{Rule, RuleTable};
use super::ComponentScorer;
use crate::config::ConfigError;
use crate::features::FeatureSet;
use crate::indicators::{Indicator, Trix};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrixParams {
    pub span: usize,
}

impl Default for TrixParams {
    fn default() -> Self {
        Self { span: 15 }
    }
}

impl TrixParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.span == 0 {
            return Err(ConfigError::ZeroWindow { field: "trix.span" });
        }
        Ok(())
    }
}

struct TrixContext {
    value: f64,
    prev: f64,
}

const TRIX_RULES: &[Rule<TrixContext>] = &[
    Rule {
        name: "positive_rising",
        value: 0.75,
        when: |c| c.value > 0.0 && c.value > c.prev,
    },
    Rule {
        name: "positive",
        value: 0.5,
        when: |c| c.value > 0.0,
    },
    Rule {
        name: "negative_falling",
        value: -0.75,
        when: |c| c.value < 0.0 && c.value < c.prev,
    },
    Rule {
        name: "negative",
        value: -0.5,
        when: |c| c.value < 0.0,
    },
];

const TRIX_TABLE: RuleTable<TrixContext> = RuleTable::new(TRIX_RULES);

#[derive(Debug, Clone)]
pub struct TrixScorer {
    params: TrixParams,
    key: String,
}

impl TrixScorer {
    pub fn new(params: TrixParams) -> Self {
        Self {
            key: Trix::key(params.span),
            params,
        }
    }
}

impl ComponentScorer for TrixScorer {
    fn name(&self) -> &str {
        "trix"
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Trix::new(self.params.span))]
    }

    fn warmup_bars(&self) -> usize {
        self.params.span + 1
    }

    fn bounds(&self) -> (f64, f64) {
        TRIX_TABLE.bounds()
    }

    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64> {
        let ctx = TrixContext {
            value: features.defined(&self.key, bar_index)?,
            prev: features.lagged(&self.key, bar_index, 1)?,
        };
        Some(TRIX_TABLE.score(&ctx))
    }
}
