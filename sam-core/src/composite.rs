//! Composite aggregation: combines component scores into the SAM series and
//! smooths it into a trend line.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::indicators::sma_of_series;
use crate::scoring::ComponentScore;

/// How component scores are combined on one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    #[default]
    Sum,
    Mean,
}

/// What an undefined component contributes.
///
/// `ZeroFill` counts it as 0, so the composite is defined from the first
/// bar. `Exclude` drops it; the composite is undefined only when every
/// component is, and `Mean` divides by the number of defined components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedPolicy {
    #[default]
    ZeroFill,
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub mode: AggregationMode,
    pub undefined: UndefinedPolicy,
    /// Window of the simple moving average that forms the trend line.
    pub trend_window: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            mode: AggregationMode::Sum,
            undefined: UndefinedPolicy::ZeroFill,
            trend_window: 12,
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trend_window == 0 {
            return Err(ConfigError::ZeroWindow {
                field: "aggregation.trend_window",
            });
        }
        Ok(())
    }
}

/// Composite score and trend line, aligned to the input bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSeries {
    pub composite: Vec<Option<f64>>,
    pub trend: Vec<Option<f64>>,
}

impl CompositeSeries {
    pub fn len(&self) -> usize {
        self.composite.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composite.is_empty()
    }

    /// First bar with a defined trend, if any.
    pub fn first_defined_trend(&self) -> Option<usize> {
        self.trend.iter().position(Option::is_some)
    }
}

/// Combine the components bar by bar, in component order.
pub fn aggregate(components: &[ComponentScore], bar_count: usize, config: &AggregationConfig) -> CompositeSeries {
    let composite: Vec<Option<f64>> = (0..bar_count)
        .map(|i| combine_bar(components, i, config))
        .collect();
    let trend = trend_line(&composite, config.trend_window);
    CompositeSeries { composite, trend }
}

fn combine_bar(components: &[ComponentScore], i: usize, config: &AggregationConfig) -> Option<f64> {
    let mut sum = 0.0;
    let mut counted = 0usize;
    for component in components {
        match (component.get(i), config.undefined) {
            (Some(v), _) => {
                sum += v;
                counted += 1;
            }
            (None, UndefinedPolicy::ZeroFill) => counted += 1,
            (None, UndefinedPolicy::Exclude) => {}
        }
    }

    if counted == 0 {
        return None;
    }
    match config.mode {
        AggregationMode::Sum => Some(sum),
        AggregationMode::Mean => Some(sum / counted as f64),
    }
}

/// Simple moving average of the composite. A window containing an undefined
/// composite is undefined.
pub fn trend_line(composite: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let raw: Vec<f64> = composite.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    sma_of_series(&raw, window)
        .into_iter()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .collect()
}
