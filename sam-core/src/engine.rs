//! Engine: wires the pipeline together for one price series.
//!
//! Features → component scores → composite and trend → signal scan →
//! trades and summary. Configuration is validated once in [`Engine::new`];
//! a built engine can run any number of series and never fails on data.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use crate::composite::aggregate;
use crate::config::{ConfigError, EngineConfig};
use crate::domain::{PriceBar, PriceSeries, SeriesError, SignalState, SkippedBar, Trade};
use crate::evaluation::{evaluate_segments, Summary};
use crate::features::extract_features;
use crate::fingerprint::{ConfigHash, RunFingerprint};
use crate::indicators::Indicator;
use crate::scoring::{create_scorers, required_indicators, score_components, ComponentScore, ComponentScorer};
use crate::signal::generate_signals;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// One output row per input bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRow {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub close: f64,
    /// `None` while undefined (only possible under the `exclude` policy).
    pub composite: Option<f64>,
    /// `None` during the trend warmup.
    pub trend: Option<f64>,
    pub signal: SignalState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    pub rows: Vec<BarRow>,
    pub components: Vec<ComponentScore>,
    pub trades: Vec<Trade>,
    pub summary: Summary,
    /// Bars before every component and the trend delta are fully informed.
    pub warmup_bars: usize,
    /// The series is no longer than the warmup; outputs are all prefix.
    pub insufficient_data: bool,
    pub fingerprint: RunFingerprint,
}

impl EngineReport {
    pub fn signals(&self) -> Vec<SignalState> {
        self.rows.iter().map(|r| r.signal).collect()
    }

    pub fn flip_count(&self) -> usize {
        self.rows.windows(2).filter(|w| w[0].signal != w[1].signal).count()
    }

    pub fn last_signal(&self) -> SignalState {
        self.rows.last().map(|r| r.signal).unwrap_or_default()
    }
}

pub struct Engine {
    config: EngineConfig,
    scorers: Vec<Box<dyn ComponentScorer>>,
    indicators: Vec<Box<dyn Indicator>>,
    config_hash: ConfigHash,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("scorers", &self.scorers.iter().map(|s| s.name()).collect::<Vec<_>>())
            .field("indicators", &self.indicators.iter().map(|i| i.name()).collect::<Vec<_>>())
            .field("config_hash", &self.config_hash)
            .finish()
    }
}

impl Engine {
    /// Validate the configuration and build the scorers.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scorers = create_scorers(&config.scorers)?;
        let indicators = required_indicators(&scorers);
        let config_hash = config.config_hash()?;
        debug!(
            scorers = scorers.len(),
            indicators = indicators.len(),
            %config_hash,
            "engine built"
        );
        Ok(Self {
            config,
            scorers,
            indicators,
            config_hash,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_hash(&self) -> &ConfigHash {
        &self.config_hash
    }

    /// First bar whose signal can depend on fully scored composites: the
    /// slowest scorer's warmup plus a full trend window plus one bar for the
    /// trend delta.
    pub fn warmup_bars(&self) -> usize {
        let scorer_warmup = self.scorers.iter().map(|s| s.warmup_bars()).max().unwrap_or(0);
        scorer_warmup + self.config.aggregation.trend_window
    }

    /// Validate raw bars with the configured malformed-bar policy, then run.
    pub fn run_bars(
        &self,
        symbol: &str,
        bars: Vec<PriceBar>,
    ) -> Result<(EngineReport, Vec<SkippedBar>), EngineError> {
        let validated = PriceSeries::from_bars(symbol, bars, self.config.data.malformed_bars)?;
        Ok((self.run(&validated.series), validated.skipped))
    }

    /// Run the full pipeline over a validated series.
    pub fn run(&self, series: &PriceSeries) -> EngineReport {
        let _span = info_span!("engine_run", symbol = series.symbol(), bars = series.len()).entered();

        let warmup_bars = self.warmup_bars();
        let insufficient_data = series.len() <= warmup_bars;
        if insufficient_data {
            warn!(
                bars = series.len(),
                warmup_bars, "series is not longer than the warmup; every bar is in the undefined prefix"
            );
        }

        let bars = series.bars();
        let closes = series.closes();

        let features = extract_features(bars, &self.indicators);
        let components = score_components(&self.scorers, &features);
        for component in &components {
            debug!(component = %component.name, defined = component.defined_count(), "component scored");
        }
        let composite = aggregate(&components, bars.len(), &self.config.aggregation);
        let timeline = generate_signals(&composite, &closes, &self.config.signal);
        let evaluation = evaluate_segments(series, &timeline.segments, &self.config.evaluation);

        let rows: Vec<BarRow> = bars
            .iter()
            .enumerate()
            .map(|(index, bar)| BarRow {
                index,
                timestamp: bar.timestamp,
                close: bar.close,
                composite: composite.composite[index],
                trend: composite.trend[index],
                signal: timeline.states[index],
            })
            .collect();

        let summary = evaluation.summary;
        info!(
            trades = summary.trade_count,
            flips = timeline.flip_count(),
            strategy_return = summary.strategy_return,
            benchmark_return = ?summary.benchmark_return,
            "run complete"
        );

        EngineReport {
            rows,
            components,
            trades: evaluation.trades,
            summary,
            warmup_bars,
            insufficient_data,
            fingerprint: RunFingerprint {
                symbol: series.symbol().to_string(),
                bars: series.len(),
                config_hash: self.config_hash.clone(),
                dataset_hash: series.dataset_hash(),
            },
        }
    }
}

/// Build an engine and run it once.
pub fn run(series: &PriceSeries, config: EngineConfig) -> Result<EngineReport, EngineError> {
    Ok(Engine::new(config)?.run(series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluate_returns;
    use crate::indicators::make_bars;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.15).sin() * 10.0 + i as f64 * 0.05)
            .collect()
    }

    #[test]
    fn rows_align_with_bars() {
        let series = PriceSeries::new("WAVE", make_bars(&wave(200))).unwrap();
        let report = run(&series, EngineConfig::default()).unwrap();
        assert_eq!(report.rows.len(), 200);
        assert_eq!(report.components.len(), 6);
        assert!(report.components.iter().all(|c| c.len() == 200));
        assert_eq!(report.fingerprint.bars, 200);
        assert!(!report.insufficient_data);
        assert_eq!(report.warmup_bars, 79 + 12);
    }

    #[test]
    fn prefix_is_hold_with_undefined_trend() {
        let series = PriceSeries::new("WAVE", make_bars(&wave(60))).unwrap();
        let report = run(&series, EngineConfig::default()).unwrap();
        for row in &report.rows[..11] {
            assert_eq!(row.trend, None);
            assert_eq!(row.signal, SignalState::Hold);
        }
        assert!(report.rows[11].trend.is_some());
    }

    #[test]
    fn short_series_flags_insufficient_data() {
        let series = PriceSeries::new("SHORT", make_bars(&[100.0, 101.0, 102.0])).unwrap();
        let report = run(&series, EngineConfig::default()).unwrap();
        assert!(report.insufficient_data);
        assert!(report.rows.iter().all(|r| r.signal == SignalState::Hold));
        assert!(report.trades.is_empty());
        assert_eq!(report.summary.strategy_return, 0.0);
    }

    #[test]
    fn invalid_config_fails_before_running() {
        let mut config = EngineConfig::default();
        config.signal.sensitivity = -0.5;
        assert!(matches!(
            Engine::new(config),
            Err(ConfigError::InvalidSensitivity(s)) if s == -0.5
        ));
    }

    #[test]
    fn trades_round_trip_through_signals() {
        let series = PriceSeries::new("WAVE", make_bars(&wave(300))).unwrap();
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let report = engine.run(&series);
        let evaluation = evaluate_returns(&series, &report.signals(), &engine.config().evaluation);
        assert_eq!(evaluation.trades, report.trades);
        assert_eq!(evaluation.summary, report.summary);
    }

    #[test]
    fn run_bars_reports_skipped() {
        let mut bars = make_bars(&wave(30));
        bars[5].high = f64::NAN;
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let (report, skipped) = engine.run_bars("WAVE", bars).unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].input_index, 5);
        assert_eq!(report.rows.len(), 29);
    }

    #[test]
    fn run_bars_reject_policy_errors() {
        let mut bars = make_bars(&wave(30));
        bars[5].close = f64::INFINITY;
        let mut config = EngineConfig::default();
        config.data.malformed_bars = crate::domain::MalformedBarPolicy::Reject;
        let engine = Engine::new(config).unwrap();
        assert!(matches!(
            engine.run_bars("WAVE", bars),
            Err(EngineError::Series(SeriesError::MalformedBar { index: 5, .. }))
        ));
    }
}
