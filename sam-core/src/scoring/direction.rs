//! Direction scorer: +0.5 when the close is above the previous close, -0.5
//! otherwise. Undefined on the first bar.

use super::rules::{Rule, RuleTable};
use super::ComponentScorer;
use crate::features::FeatureSet;
use crate::indicators::Indicator;

const DIRECTION_RULES: &[Rule<bool>] = &[
    Rule {
        name: "up",
        value: 0.5,
        when: |up| *up,
    },
    Rule {
        name: "not_up",
        value: -0.5,
        when: |up| !*up,
    },
];

const DIRECTION_TABLE: RuleTable<bool> = RuleTable::new(DIRECTION_RULES);

#[derive(Debug, Clone, Default)]
pub struct DirectionScorer;

impl DirectionScorer {
    pub fn new() -> Self {
        Self
    }
}

impl ComponentScorer for DirectionScorer {
    fn name(&self) -> &str {
        "direction"
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        Vec::new()
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn bounds(&self) -> (f64, f64) {
        DIRECTION_TABLE.bounds()
    }

    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64> {
        let up = features.candles().close_up(bar_index, 0)?;
        Some(DIRECTION_TABLE.score(&up))
    }
}
