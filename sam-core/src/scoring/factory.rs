//! Factory: converts `ScorerConfig` into runtime scorers and resolves the
//! indicator set they need precomputed.

use std::collections::HashSet;

use super::{
    ComponentScorer, DirectionScorer, ExtremeScorer, GrowthScorer, MomentumScorer, PatternScorer,
    ScorerConfig, TrendCrossScorer, TrixScorer, VolatilityScorer,
};
use crate::config::ConfigError;
use crate::indicators::Indicator;

/// Create a scorer from its configuration.
///
/// Parameters are validated first; indicator constructors assert on
/// out-of-range values and must never see them.
pub fn create_scorer(config: &ScorerConfig) -> Result<Box<dyn ComponentScorer>, ConfigError> {
    config.validate()?;
    let scorer: Box<dyn ComponentScorer> = match config {
        ScorerConfig::Pattern => Box::new(PatternScorer::new()),
        ScorerConfig::Growth(p) => Box::new(GrowthScorer::new(p.clone())),
        ScorerConfig::TrendCross(p) => Box::new(TrendCrossScorer::new(p.clone())),
        ScorerConfig::Momentum(p) => Box::new(MomentumScorer::new(p.clone())),
        ScorerConfig::Volatility(p) => Box::new(VolatilityScorer::new(p.clone())),
        ScorerConfig::Extreme(p) => Box::new(ExtremeScorer::new(p.clone())),
        ScorerConfig::Direction => Box::new(DirectionScorer::new()),
        ScorerConfig::Trix(p) => Box::new(TrixScorer::new(p.clone())),
    };
    Ok(scorer)
}

/// Create every configured scorer, in configuration order.
pub fn create_scorers(configs: &[ScorerConfig]) -> Result<Vec<Box<dyn ComponentScorer>>, ConfigError> {
    if configs.is_empty() {
        return Err(ConfigError::NoScorers);
    }
    configs.iter().map(create_scorer).collect()
}

/// Collect the indicators all scorers need, de-duplicated by name.
///
/// Two scorers asking for the same series (e.g. growth and trend cross both
/// on `wma_18`) share one computation.
pub fn required_indicators(scorers: &[Box<dyn ComponentScorer>]) -> Vec<Box<dyn Indicator>> {
    let mut seen = HashSet::new();
    let mut indicators: Vec<Box<dyn Indicator>> = Vec::new();

    for scorer in scorers {
        for ind in scorer.required_indicators() {
            if seen.insert(ind.name().to_string()) {
                indicators.push(ind);
            }
        }
    }

    indicators
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{default_scorers, GrowthParams, TrendCrossParams};

    #[test]
    fn creates_each_kind() {
        for config in default_scorers() {
            let scorer = create_scorer(&config).unwrap();
            assert_eq!(scorer.name(), config.kind());
        }
    }

    #[test]
    fn invalid_params_fail_before_construction() {
        let config = ScorerConfig::Growth(GrowthParams {
            window: 0,
            threshold: 0.01,
        });
        assert!(matches!(
            create_scorer(&config),
            Err(ConfigError::ZeroWindow { field: "growth.window" })
        ));
    }

    #[test]
    fn empty_scorer_list_is_rejected() {
        assert!(matches!(create_scorers(&[]), Err(ConfigError::NoScorers)));
    }

    #[test]
    fn shared_indicators_are_deduplicated() {
        let scorers = create_scorers(&[
            ScorerConfig::Growth(GrowthParams {
                window: 6,
                threshold: 0.01,
            }),
            ScorerConfig::TrendCross(TrendCrossParams { fast: 6, slow: 20 }),
        ])
        .unwrap();
        let names: Vec<String> = required_indicators(&scorers)
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, vec!["wma_6".to_string(), "wma_20".to_string()]);
    }

    #[test]
    fn default_set_indicator_names() {
        let scorers = create_scorers(&default_scorers()).unwrap();
        let names: HashSet<String> = required_indicators(&scorers)
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        for expected in ["wma_18", "wma_6", "wma_80", "macd_12_26_9", "macd_signal_12_26_9", "trix_15"] {
            assert!(names.contains(expected), "missing {expected}");
        }
        assert_eq!(names.len(), 6);
    }
}
