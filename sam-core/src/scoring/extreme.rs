//! Extreme-move scorer: one-bar percentage change outside a band of
//! `sigmas` rolling standard deviations.

use serde::{Deserialize, Serialize};

use super::rules::{Rule, RuleTable};
use super::ComponentScorer;
use crate::config::ConfigError;
use crate::features::FeatureSet;
use crate::indicators::{Indicator, PctChange, StdDev};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtremeParams {
    pub window: usize,
    pub sigmas: f64,
}

impl Default for ExtremeParams {
    fn default() -> Self {
        Self {
            window: 20,
            sigmas: 2.0,
        }
    }
}

impl ExtremeParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow {
                field: "extreme.window",
            });
        }
        if self.window < 2 {
            return Err(ConfigError::InvalidParameter {
                field: "extreme.window",
                reason: "a sample standard deviation needs at least 2 observations".into(),
            });
        }
        if !self.sigmas.is_finite() || self.sigmas <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                field: "extreme.sigmas",
                reason: format!("must be a finite value > 0, got {}", self.sigmas),
            });
        }
        Ok(())
    }
}

struct MoveContext {
    change: f64,
    band: f64,
}

const EXTREME_RULES: &[Rule<MoveContext>] = &[
    Rule {
        name: "spike_up",
        value: 1.0,
        when: |c| c.change > c.band,
    },
    Rule {
        name: "spike_down",
        value: -1.0,
        when: |c| c.change < -c.band,
    },
];

const EXTREME_TABLE: RuleTable<MoveContext> = RuleTable::new(EXTREME_RULES);

#[derive(Debug, Clone)]
pub struct ExtremeScorer {
    params: ExtremeParams,
    change_key: String,
    std_key: String,
}

impl ExtremeScorer {
    pub fn new(params: ExtremeParams) -> Self {
        Self {
            change_key: PctChange::key(1),
            std_key: StdDev::key(params.window),
            params,
        }
    }
}

impl ComponentScorer for ExtremeScorer {
    fn name(&self) -> &str {
        "extreme"
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(PctChange::new(1)),
            Box::new(StdDev::new(self.params.window)),
        ]
    }

    fn warmup_bars(&self) -> usize {
        self.params.window
    }

    fn bounds(&self) -> (f64, f64) {
        EXTREME_TABLE.bounds()
    }

    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64> {
        let std = features.defined(&self.std_key, bar_index)?;
        let ctx = MoveContext {
            change: features.defined(&self.change_key, bar_index)?,
            band: self.params.sigmas * std,
        };
        Some(EXTREME_TABLE.score(&ctx))
    }
}
