//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Determinism: identical input and config give bit-identical reports
//! 2. No-flicker: a sub-threshold trend change never changes the signal
//! 3. Segment closure: every trade but the last is closed, exit >= entry
//! 4. Degenerate sensitivity: an unreachable threshold means no trades
//! 5. Round-trip: re-evaluating the per-bar signals reproduces the trades

use chrono::NaiveDate;
use proptest::prelude::*;
use sam_core::domain::TradeStatus;
use sam_core::evaluation::{evaluate_returns, OpenPositionPolicy};
use sam_core::signal::SignalPolicy;
use sam_core::{Engine, EngineConfig, PriceBar, PriceSeries, SignalState};

// ── Strategies (proptest) ────────────────────────────────────────────

/// Random walk of closes as multiplicative steps.
fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    (
        20.0..500.0_f64,
        prop::collection::vec(-0.04..0.04_f64, 40..160),
    )
        .prop_map(|(start, steps)| {
            let mut price = start;
            let mut closes = Vec::with_capacity(steps.len() + 1);
            closes.push(price);
            for step in steps {
                price = (price * (1.0 + step)).max(0.01);
                closes.push(price);
            }
            closes
        })
}

fn arb_sensitivity() -> impl Strategy<Value = f64> {
    (1..100u32).prop_map(|s| s as f64 / 100.0)
}

fn series_from(closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut prev = closes[0];
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = prev;
            prev = close;
            PriceBar::new(
                base + chrono::Duration::days(i as i64),
                open,
                open.max(close) * 1.01,
                open.min(close) * 0.99,
                close,
            )
        })
        .collect();
    PriceSeries::new("PROP", bars).unwrap()
}

/// Small windows so short random series leave the warmup quickly.
fn fast_config(sensitivity: f64) -> EngineConfig {
    let mut config = EngineConfig::from_toml_str(
        r#"
        [aggregation]
        trend_window = 4

        [[scorers]]
        kind = "pattern"

        [[scorers]]
        kind = "growth"
        window = 5

        [[scorers]]
        kind = "trend_cross"
        fast = 3
        slow = 10

        [[scorers]]
        kind = "momentum"
        fast = 3
        slow = 8
        signal = 3

        [[scorers]]
        kind = "direction"

        [[scorers]]
        kind = "trix"
        span = 5
        "#,
    )
    .unwrap();
    config.signal.sensitivity = sensitivity;
    config
}

// ── 1. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn identical_inputs_give_identical_reports(closes in arb_closes(), s in arb_sensitivity()) {
        let series = series_from(&closes);
        let a = Engine::new(fast_config(s)).unwrap().run(&series);
        let b = Engine::new(fast_config(s)).unwrap().run(&series);
        prop_assert_eq!(&a.fingerprint, &b.fingerprint);
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

// ── 2. No-flicker ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sub_threshold_trend_moves_keep_the_signal(closes in arb_closes(), s in arb_sensitivity()) {
        let report = Engine::new(fast_config(s)).unwrap().run(&series_from(&closes));
        for w in report.rows.windows(2) {
            if let (Some(prev), Some(curr)) = (w[0].trend, w[1].trend) {
                if (curr - prev).abs() <= s {
                    prop_assert_eq!(w[0].signal, w[1].signal, "bar {}", w[1].index);
                }
            }
        }
    }
}

// ── 3. Segment closure ───────────────────────────────────────────────

proptest! {
    #[test]
    fn segments_close_in_order(closes in arb_closes(), s in arb_sensitivity(), mark in any::<bool>()) {
        let mut config = fast_config(s);
        if mark {
            config.evaluation.open_position = OpenPositionPolicy::MarkUnrealized;
        }
        let report = Engine::new(config).unwrap().run(&series_from(&closes));

        let n = report.trades.len();
        for (k, trade) in report.trades.iter().enumerate() {
            prop_assert!(trade.exit_time >= trade.entry_time);
            prop_assert!(trade.exit_index >= trade.entry_index);
            if k + 1 < n {
                prop_assert_eq!(trade.status, TradeStatus::Closed);
                prop_assert!(trade.exit_index < report.trades[k + 1].entry_index);
            }
        }
        // trades never overlap and always sit on non-Hold bars
        for trade in &report.trades {
            for row in &report.rows[trade.entry_index..=trade.exit_index] {
                prop_assert_ne!(row.signal, SignalState::Hold);
            }
        }
    }
}

// ── 4. Degenerate sensitivity ────────────────────────────────────────

proptest! {
    #[test]
    fn unreachable_sensitivity_never_trades(closes in arb_closes()) {
        let report = Engine::new(fast_config(f64::MAX)).unwrap().run(&series_from(&closes));
        prop_assert_eq!(report.flip_count(), 0);
        prop_assert!(report.trades.is_empty());
        prop_assert_eq!(report.summary.strategy_return, 0.0);
        prop_assert!(report.rows.iter().all(|r| r.signal == SignalState::Hold));
    }
}

// ── 5. Round-trip ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn signals_alone_reproduce_trades(
        closes in arb_closes(),
        s in arb_sensitivity(),
        confirmation in any::<bool>(),
    ) {
        let mut config = fast_config(s);
        if confirmation {
            config.signal.policy = SignalPolicy::Confirmation;
        }
        let engine = Engine::new(config).unwrap();
        let series = series_from(&closes);
        let report = engine.run(&series);

        let evaluation = evaluate_returns(&series, &report.signals(), &engine.config().evaluation);
        prop_assert_eq!(evaluation.trades, report.trades);
        prop_assert_eq!(evaluation.summary, report.summary);
    }
}
