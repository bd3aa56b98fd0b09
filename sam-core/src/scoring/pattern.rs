//! Candle-pattern scorer.
//!
//! Reads eight lagged candle comparisons:
//!
//! | flag | bullish                 | flag | bearish                 |
//! |------|-------------------------|------|-------------------------|
//! | c1   | close > open            | c5   | close < open            |
//! | c2   | close[-1] > open[-1]    | c6   | close[-1] < open[-1]    |
//! | c3   | close > close[-1]       | c7   | close < close[-1]       |
//! | c4   | close[-1] > close[-2]   | c8   | close[-1] < close[-2]   |
//!
//! and scores the first matching pattern, from four-bar confirmation down to
//! a single disagreeing comparison. Range: [-1.25, 1.25].

use super::rules::{Rule, RuleTable};
use super::ComponentScorer;
use crate::features::FeatureSet;
use crate::indicators::Indicator;

#[derive(Debug, Clone, Copy)]
struct PatternContext {
    c1: bool,
    c2: bool,
    c3: bool,
    c4: bool,
    c5: bool,
    c6: bool,
    c7: bool,
    c8: bool,
}

// A bar that closes above its open but below the previous close (or the
// reverse) matches both one-bar rules; the bearish one is listed first.
const PATTERN_RULES: &[Rule<PatternContext>] = &[
    Rule {
        name: "bull_four_bar",
        value: 1.25,
        when: |c| c.c1 && c.c2 && c.c3 && c.c4,
    },
    Rule {
        name: "bear_four_bar",
        value: -1.25,
        when: |c| c.c5 && c.c6 && c.c7 && c.c8,
    },
    Rule {
        name: "bull_three_bar",
        value: 1.0,
        when: |c| c.c1 && c.c3 && c.c4 && !c.c2,
    },
    Rule {
        name: "bear_three_bar",
        value: -1.0,
        when: |c| c.c5 && c.c7 && c.c8 && !c.c6,
    },
    Rule {
        name: "bull_two_bar",
        value: 0.5,
        when: |c| c.c1 && c.c3 && !c.c2 && !c.c4,
    },
    Rule {
        name: "bear_two_bar",
        value: -0.5,
        when: |c| c.c5 && c.c7 && !c.c6 && !c.c8,
    },
    Rule {
        name: "bear_one_bar",
        value: -0.25,
        when: |c| c.c5 != c.c7,
    },
    Rule {
        name: "bull_one_bar",
        value: 0.25,
        when: |c| c.c1 != c.c3,
    },
];

const PATTERN_TABLE: RuleTable<PatternContext> = RuleTable::new(PATTERN_RULES);

#[derive(Debug, Clone, Default)]
pub struct PatternScorer;

impl PatternScorer {
    pub fn new() -> Self {
        Self
    }

    /// Name of the rule that decided bar `i`, if any. Useful for diagnostics.
    pub fn matched_rule(&self, features: &FeatureSet, bar_index: usize) -> Option<&'static str> {
        let ctx = context(features, bar_index)?;
        PATTERN_TABLE.first_match(&ctx).map(|r| r.name)
    }
}

fn context(features: &FeatureSet, i: usize) -> Option<PatternContext> {
    let candles = features.candles();
    Some(PatternContext {
        c1: candles.bullish_body(i, 0)?,
        c2: candles.bullish_body(i, 1)?,
        c3: candles.close_up(i, 0)?,
        c4: candles.close_up(i, 1)?,
        c5: candles.bearish_body(i, 0)?,
        c6: candles.bearish_body(i, 1)?,
        c7: candles.close_down(i, 0)?,
        c8: candles.close_down(i, 1)?,
    })
}

impl ComponentScorer for PatternScorer {
    fn name(&self) -> &str {
        "pattern"
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        Vec::new()
    }

    fn warmup_bars(&self) -> usize {
        // c4/c8 compare close[-1] with close[-2]
        2
    }

    fn bounds(&self) -> (f64, f64) {
        PATTERN_TABLE.bounds()
    }

    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64> {
        context(features, bar_index).map(|ctx| PATTERN_TABLE.score(&ctx))
    }
}
