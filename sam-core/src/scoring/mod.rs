//! Component scorers: independent, bounded, backward-looking per-bar scores.
//!
//! Each scorer reads precomputed features and maps bar `i` to a score, or
//! `None` while its inputs are still undefined. Scorers never see other
//! scorers' output and never read a bar after `i`.

pub mod direction;
pub mod extreme;
pub mod factory;
pub mod growth;
pub mod momentum;
pub mod pattern;
pub mod rules;
pub mod trend_cross;
pub mod trix;
pub mod volatility;

pub use direction::DirectionScorer;
pub use extreme::{ExtremeParams, ExtremeScorer};
pub use factory::{create_scorer, create_scorers, required_indicators};
pub use growth::{GrowthParams, GrowthScorer};
pub use momentum::{MomentumParams, MomentumScorer};
pub use pattern::PatternScorer;
pub use rules::{Rule, RuleTable};
pub use trend_cross::{TrendCrossParams, TrendCrossScorer};
pub use trix::{TrixParams, TrixScorer};
pub use volatility::{VolatilityParams, VolatilityScorer};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::features::FeatureSet;
use crate::indicators::Indicator;

/// Trait for component scorers.
///
/// # Architecture invariant
/// `score_bar(features, i)` must only read feature values at indices `<= i`.
/// Features are computed from the full series up front, so a scorer that
/// peeks ahead would silently see the future.
pub trait ComponentScorer: Send + Sync {
    /// Stable name, used as the column name in reports.
    fn name(&self) -> &str;

    /// Indicators this scorer reads from the feature set.
    fn required_indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// Index of the first bar that can have a defined score.
    fn warmup_bars(&self) -> usize;

    /// Smallest and largest score this scorer can emit.
    fn bounds(&self) -> (f64, f64);

    /// Score bar `bar_index`, or `None` while inputs are undefined.
    fn score_bar(&self, features: &FeatureSet, bar_index: usize) -> Option<f64>;

    /// Score every bar in order.
    fn score(&self, features: &FeatureSet) -> ComponentScore {
        ComponentScore {
            name: self.name().to_string(),
            values: (0..features.bar_count())
                .map(|i| self.score_bar(features, i))
                .collect(),
        }
    }
}

/// A named per-bar score series. `None` marks undefined bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl ComponentScore {
    pub fn get(&self, bar_index: usize) -> Option<f64> {
        self.values.get(bar_index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of bars with a defined score.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Configuration for one scorer, tagged by `kind`.
///
/// ```toml
/// [[scorers]]
/// kind = "growth"
/// window = 18
/// threshold = 0.0015
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScorerConfig {
    Pattern,
    Growth(GrowthParams),
    TrendCross(TrendCrossParams),
    Momentum(MomentumParams),
    Volatility(VolatilityParams),
    Extreme(ExtremeParams),
    Direction,
    Trix(TrixParams),
}

impl ScorerConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ScorerConfig::Pattern => "pattern",
            ScorerConfig::Growth(_) => "growth",
            ScorerConfig::TrendCross(_) => "trend_cross",
            ScorerConfig::Momentum(_) => "momentum",
            ScorerConfig::Volatility(_) => "volatility",
            ScorerConfig::Extreme(_) => "extreme",
            ScorerConfig::Direction => "direction",
            ScorerConfig::Trix(_) => "trix",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ScorerConfig::Pattern | ScorerConfig::Direction => Ok(()),
            ScorerConfig::Growth(p) => p.validate(),
            ScorerConfig::TrendCross(p) => p.validate(),
            ScorerConfig::Momentum(p) => p.validate(),
            ScorerConfig::Volatility(p) => p.validate(),
            ScorerConfig::Extreme(p) => p.validate(),
            ScorerConfig::Trix(p) => p.validate(),
        }
    }
}

/// The standard SAM composite: pattern, growth, trend cross,
/// momentum, direction and TRIX with their classic parameters.
pub fn default_scorers() -> Vec<ScorerConfig> {
    vec![
        ScorerConfig::Pattern,
        ScorerConfig::Growth(GrowthParams::default()),
        ScorerConfig::TrendCross(TrendCrossParams::default()),
        ScorerConfig::Momentum(MomentumParams::default()),
        ScorerConfig::Direction,
        ScorerConfig::Trix(TrixParams::default()),
    ]
}

/// Run every scorer over the feature set.
///
/// Scorers are independent, so they run in parallel; each scorer's own bar
/// loop is sequential and the output keeps the input order.
pub fn score_components(
    scorers: &[Box<dyn ComponentScorer>],
    features: &FeatureSet,
) -> Vec<ComponentScore> {
    scorers.par_iter().map(|s| s.score(features)).collect()
}
