//! Look-ahead contamination tests for indicators, scorers and the engine.
//!
//! Invariant: no output at bar t may depend on price data from bar t+1 or
//! later.
//!
//! Method: compute on a truncated series (bars 0..150) and the full series
//! (bars 0..300). Bars 0..150 must be bit-identical between both runs. Any
//! difference means future data leaked into past values.

use chrono::NaiveDate;
use sam_core::engine::Engine;
use sam_core::features::extract_features;
use sam_core::indicators::*;
use sam_core::scoring::*;
use sam_core::{EngineConfig, PriceBar, PriceSeries};

const FULL: usize = 300;
const TRUNCATED: usize = 150;

/// Generate N bars of synthetic OHLC data with realistic variation.
fn make_test_bars(n: usize) -> Vec<PriceBar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let change = ((seed >> 33) % 200) as f64 / 100.0 - 1.0; // -1.0 to +0.99
        price = (price + change).max(10.0);

        let open = price - change * 0.5;
        let close = price;
        let high = open.max(close) + 0.75;
        let low = open.min(close) - 0.75;

        bars.push(
            PriceBar::new(base + chrono::Duration::days(i as i64), open, high, low, close)
                .with_volume(1000.0 + i as f64),
        );
    }

    bars
}

fn same_value(t: f64, f: f64) -> bool {
    (t.is_nan() && f.is_nan()) || t.to_bits() == f.to_bits()
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[PriceBar]) {
    let full_result = indicator.compute(full_bars);
    let truncated_result = indicator.compute(&full_bars[..TRUNCATED]);

    assert_eq!(truncated_result.len(), TRUNCATED, "{}: length", indicator.name());
    assert_eq!(full_result.len(), full_bars.len(), "{}: length", indicator.name());

    for i in 0..TRUNCATED {
        assert!(
            same_value(truncated_result[i], full_result[i]),
            "{}: bar {i} differs (truncated={}, full={})",
            indicator.name(),
            truncated_result[i],
            full_result[i]
        );
    }
}

// ── Indicators ───────────────────────────────────────────────────────

#[test]
fn indicators_do_not_look_ahead() {
    let bars = make_test_bars(FULL);
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Sma::new(12)),
        Box::new(Wma::new(6)),
        Box::new(Wma::new(80)),
        Box::new(Ewma::new(12, EwmaMode::Recursive)),
        Box::new(Ewma::new(15, EwmaMode::Adjusted)),
        Box::new(Macd::line(12, 26, 9)),
        Box::new(Macd::signal(12, 26, 9)),
        Box::new(PctChange::new(1)),
        Box::new(Range),
        Box::new(RangeMean::new(14)),
        Box::new(StdDev::new(20)),
        Box::new(Trix::new(15)),
    ];
    for indicator in &indicators {
        assert_no_lookahead(indicator.as_ref(), &bars);
    }
}

// ── Scorers ──────────────────────────────────────────────────────────

#[test]
fn scorers_do_not_look_ahead() {
    let bars = make_test_bars(FULL);
    let configs = vec![
        ScorerConfig::Pattern,
        ScorerConfig::Growth(GrowthParams::default()),
        ScorerConfig::TrendCross(TrendCrossParams::default()),
        ScorerConfig::Momentum(MomentumParams::default()),
        ScorerConfig::Volatility(VolatilityParams::default()),
        ScorerConfig::Extreme(ExtremeParams::default()),
        ScorerConfig::Direction,
        ScorerConfig::Trix(TrixParams::default()),
    ];
    let scorers = create_scorers(&configs).unwrap();
    let indicators = required_indicators(&scorers);

    let full = score_components(&scorers, &extract_features(&bars, &indicators));
    let truncated = score_components(&scorers, &extract_features(&bars[..TRUNCATED], &indicators));

    for (t, f) in truncated.iter().zip(&full) {
        assert_eq!(t.name, f.name);
        assert_eq!(&t.values[..], &f.values[..TRUNCATED], "{} leaks future data", t.name);
    }
}

// ── Full engine ──────────────────────────────────────────────────────

#[test]
fn engine_rows_do_not_look_ahead() {
    let series = PriceSeries::new("TEST", make_test_bars(FULL)).unwrap();
    let engine = Engine::new(EngineConfig::default()).unwrap();

    let full = engine.run(&series);
    let truncated = engine.run(&series.truncated(TRUNCATED));

    assert_eq!(truncated.rows.len(), TRUNCATED);
    assert_eq!(&truncated.rows[..], &full.rows[..TRUNCATED]);
}

#[test]
fn closed_trades_do_not_look_ahead() {
    let series = PriceSeries::new("TEST", make_test_bars(FULL)).unwrap();
    let engine = Engine::new(EngineConfig::default()).unwrap();

    let full = engine.run(&series);
    let truncated = engine.run(&series.truncated(TRUNCATED));

    // Every trade that closed strictly inside the truncated window is the
    // same in both runs; only the final, force-closed one may differ.
    let closed_early: Vec<_> = truncated
        .trades
        .iter()
        .filter(|t| t.exit_index + 1 < TRUNCATED)
        .collect();
    for trade in closed_early {
        assert!(full.trades.contains(trade), "trade at {} changed", trade.entry_index);
    }
}
