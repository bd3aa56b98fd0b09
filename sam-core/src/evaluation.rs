//! Return evaluation: turns signal segments into trades and summarises them
//! against buy-and-hold.
//!
//! Entry is the close of a segment's first bar, exit the close of its last
//! bar. Short segments profit when the price falls. Every trade also carries
//! the long-only return over the same span for comparison.

use serde::{Deserialize, Serialize};

use crate::domain::{simple_return, PriceSeries, SignalState, Trade, TradeStatus};
use crate::signal::Segment;

/// What happens to a segment still open at the last bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenPositionPolicy {
    /// Close at the last close; counts towards the strategy return.
    #[default]
    ForceClose,
    /// Mark to the last close as `Open`; reported separately.
    MarkUnrealized,
}

/// How per-trade returns combine into the strategy return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnAggregation {
    /// Π(1 + r) − 1
    #[default]
    Compound,
    /// Σ r
    Sum,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub open_position: OpenPositionPolicy,
    pub aggregation: ReturnAggregation,
}

/// Whole-run totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Aggregated return of closed trades with an available return.
    pub strategy_return: f64,
    /// Buy-and-hold from the first to the last close.
    pub benchmark_return: Option<f64>,
    /// Return of the trade left open under `mark_unrealized`.
    pub unrealized_return: Option<f64>,
    pub trade_count: usize,
    pub winning_trades: usize,
    /// Trades whose return could not be computed (zero entry price).
    pub unavailable_returns: usize,
}

impl Summary {
    /// Winning share of closed trades with an available return.
    pub fn win_rate(&self) -> f64 {
        let evaluated = self.trade_count - self.unavailable_returns - usize::from(self.unrealized_return.is_some());
        if evaluated == 0 {
            0.0
        } else {
            self.winning_trades as f64 / evaluated as f64
        }
    }

    /// Strategy minus benchmark, when the benchmark is available.
    pub fn excess_return(&self) -> Option<f64> {
        self.benchmark_return.map(|b| self.strategy_return - b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub trades: Vec<Trade>,
    pub summary: Summary,
}

/// Split a per-bar state sequence into maximal non-Hold runs.
///
/// Produces exactly what the signal scan records while it runs, so a
/// timeline can be re-evaluated from its states alone.
pub fn segments_from_states(states: &[SignalState], closes: &[f64]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut previous = SignalState::Hold;

    for (i, (&state, &close)) in states.iter().zip(closes).enumerate() {
        if state == previous {
            continue;
        }
        if let Some(open) = segments.last_mut().filter(|s| s.is_open()) {
            open.end_index = Some(i - 1);
            open.end_price = Some(closes[i - 1]);
        }
        if !state.is_hold() {
            segments.push(Segment {
                state,
                start_index: i,
                start_price: close,
                end_index: None,
                end_price: None,
            });
        }
        previous = state;
    }

    segments
}

/// Evaluate trades straight from per-bar signal states.
pub fn evaluate_returns(series: &PriceSeries, states: &[SignalState], config: &EvaluationConfig) -> Evaluation {
    let segments = segments_from_states(states, &series.closes());
    evaluate_segments(series, &segments, config)
}

/// Evaluate already-recorded segments.
pub fn evaluate_segments(series: &PriceSeries, segments: &[Segment], config: &EvaluationConfig) -> Evaluation {
    let bars = series.bars();
    let Some(last_index) = bars.len().checked_sub(1) else {
        return Evaluation::default();
    };

    let trades: Vec<Trade> = segments
        .iter()
        .filter_map(|segment| {
            let direction = segment.state.direction()?;
            let (exit_index, status) = match (segment.end_index, config.open_position) {
                (Some(end), _) => (end, TradeStatus::Closed),
                (None, OpenPositionPolicy::ForceClose) => (last_index, TradeStatus::Closed),
                (None, OpenPositionPolicy::MarkUnrealized) => (last_index, TradeStatus::Open),
            };
            let entry = &bars[segment.start_index];
            let exit = &bars[exit_index];
            let benchmark_return = simple_return(entry.close, exit.close);
            Some(Trade {
                direction,
                entry_index: segment.start_index,
                entry_time: entry.timestamp,
                entry_price: entry.close,
                exit_index,
                exit_time: exit.timestamp,
                exit_price: exit.close,
                bars_held: exit_index - segment.start_index + 1,
                status,
                realized_return: benchmark_return.map(|r| r * direction.sign()),
                benchmark_return,
            })
        })
        .collect();

    let summary = summarize(series, &trades, config.aggregation);
    Evaluation { trades, summary }
}

fn summarize(series: &PriceSeries, trades: &[Trade], aggregation: ReturnAggregation) -> Summary {
    let realized: Vec<f64> = trades
        .iter()
        .filter(|t| !t.is_open())
        .filter_map(|t| t.realized_return)
        .collect();

    let strategy_return = match aggregation {
        ReturnAggregation::Compound => realized.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0,
        ReturnAggregation::Sum => realized.iter().sum(),
    };

    let benchmark_return = match (series.first(), series.last()) {
        (Some(first), Some(last)) => simple_return(first.close, last.close),
        _ => None,
    };

    Summary {
        strategy_return,
        benchmark_return,
        unrealized_return: trades.iter().find(|t| t.is_open()).and_then(|t| t.realized_return),
        trade_count: trades.len(),
        winning_trades: trades.iter().filter(|t| !t.is_open() && t.is_winner()).count(),
        unavailable_returns: trades.iter().filter(|t| t.realized_return.is_none()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, PriceBar};
    use crate::domain::SignalState::{Buy, Hold, Sell};
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new("TEST", make_bars(closes)).unwrap()
    }

    #[test]
    fn segments_split_on_every_change() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let segs = segments_from_states(&[Hold, Buy, Buy, Sell, Hold, Buy], &closes);
        assert_eq!(segs.len(), 3);
        assert_eq!((segs[0].start_index, segs[0].end_index), (1, Some(2)));
        assert_eq!(segs[0].end_price, Some(12.0));
        assert_eq!((segs[1].start_index, segs[1].end_index), (3, Some(3)));
        assert_eq!((segs[2].start_index, segs[2].end_index), (5, None));
    }

    #[test]
    fn long_and_short_returns() {
        let s = series(&[100.0, 100.0, 110.0, 121.0, 110.0, 99.0]);
        let states = [Hold, Buy, Buy, Sell, Sell, Sell];
        let eval = evaluate_returns(&s, &states, &EvaluationConfig::default());

        assert_eq!(eval.trades.len(), 2);
        let long = &eval.trades[0];
        assert_eq!(long.direction, Direction::Long);
        assert_eq!((long.entry_price, long.exit_price), (100.0, 110.0));
        assert_approx(long.realized_return.unwrap(), 0.10, DEFAULT_EPSILON);
        assert_eq!(long.bars_held, 2);

        let short = &eval.trades[1];
        assert_eq!(short.direction, Direction::Short);
        assert_eq!(short.status, TradeStatus::Closed);
        assert_eq!((short.entry_price, short.exit_price), (121.0, 99.0));
        assert_approx(short.realized_return.unwrap(), 22.0 / 121.0, DEFAULT_EPSILON);
        assert_approx(short.benchmark_return.unwrap(), -22.0 / 121.0, DEFAULT_EPSILON);

        let expected = 1.10 * (1.0 + 22.0 / 121.0) - 1.0;
        assert_approx(eval.summary.strategy_return, expected, DEFAULT_EPSILON);
        assert_approx(eval.summary.benchmark_return.unwrap(), -0.01, DEFAULT_EPSILON);
        assert_eq!(eval.summary.trade_count, 2);
        assert_eq!(eval.summary.winning_trades, 2);
        assert_approx(eval.summary.win_rate(), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sum_aggregation() {
        let s = series(&[100.0, 110.0, 100.0, 90.0]);
        let config = EvaluationConfig {
            aggregation: ReturnAggregation::Sum,
            ..Default::default()
        };
        let eval = evaluate_returns(&s, &[Buy, Buy, Buy, Buy], &config);
        assert_approx(eval.summary.strategy_return, -0.10, DEFAULT_EPSILON);
    }

    #[test]
    fn mark_unrealized_excludes_open_trade() {
        let s = series(&[100.0, 110.0, 120.0, 132.0]);
        let states = [Buy, Buy, Sell, Sell];
        let config = EvaluationConfig {
            open_position: OpenPositionPolicy::MarkUnrealized,
            ..Default::default()
        };
        let eval = evaluate_returns(&s, &states, &config);
        assert_eq!(eval.trades[1].status, TradeStatus::Open);
        assert_approx(eval.summary.strategy_return, 0.10, DEFAULT_EPSILON);
        assert_approx(eval.summary.unrealized_return.unwrap(), -0.10, DEFAULT_EPSILON);
        assert_eq!(eval.summary.winning_trades, 1);
        assert_approx(eval.summary.win_rate(), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_entry_price_is_unavailable_not_infinite() {
        let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars: Vec<PriceBar> = [0.0, 5.0, 10.0, 12.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(base + chrono::Duration::days(i as i64), c, c, c, c))
            .collect();
        let s = PriceSeries::new("ZERO", bars).unwrap();
        let eval = evaluate_returns(&s, &[Buy, Buy, Sell, Sell], &EvaluationConfig::default());

        assert_eq!(eval.trades[0].realized_return, None);
        assert_eq!(eval.summary.unavailable_returns, 1);
        assert_eq!(eval.summary.benchmark_return, None);
        // only the short trade counts: 10 → 12 is -20%
        assert_approx(eval.summary.strategy_return, -0.2, DEFAULT_EPSILON);
        assert_eq!(eval.summary.excess_return(), None);
    }

    #[test]
    fn all_hold_means_no_trades_and_zero_return() {
        let s = series(&[100.0, 120.0, 90.0]);
        let eval = evaluate_returns(&s, &[Hold, Hold, Hold], &EvaluationConfig::default());
        assert!(eval.trades.is_empty());
        assert_eq!(eval.summary.strategy_return, 0.0);
        assert_eq!(eval.summary.win_rate(), 0.0);
        assert_approx(eval.summary.excess_return().unwrap(), 0.10, DEFAULT_EPSILON);
    }

    #[test]
    fn exit_never_precedes_entry() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let eval = evaluate_returns(&s, &[Sell, Buy, Sell, Buy, Sell], &EvaluationConfig::default());
        assert_eq!(eval.trades.len(), 5);
        for t in &eval.trades {
            assert!(t.exit_time >= t.entry_time);
            assert_eq!(t.bars_held, 1);
            assert_eq!(t.realized_return, Some(0.0));
        }
    }
}
