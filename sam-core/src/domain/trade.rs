//! Trade: one maximal run of bars sharing a non-Hold signal.

use super::signal::Direction;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Whether the trade was closed by a flip/forced close or is still open and
/// marked to the last close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Closed,
    Open,
}

/// A signal segment evaluated as a round trip: entry → exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub direction: Direction,

    // ── Entry ──
    pub entry_index: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,

    // ── Exit (mark price when `status == Open`) ──
    pub exit_index: usize,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,

    pub bars_held: usize,
    pub status: TradeStatus,

    /// Fractional return, sign-flipped for shorts. `None` when the entry
    /// price is zero or the ratio is not finite.
    pub realized_return: Option<f64>,
    /// Direction-agnostic buy-and-hold return over the same span.
    pub benchmark_return: Option<f64>,
}

impl Trade {
    /// Realized return as a percentage.
    pub fn return_pct(&self) -> Option<f64> {
        self.realized_return.map(|r| r * 100.0)
    }

    pub fn benchmark_pct(&self) -> Option<f64> {
        self.benchmark_return.map(|r| r * 100.0)
    }

    pub fn is_winner(&self) -> bool {
        self.realized_return.is_some_and(|r| r > 0.0)
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }
}

/// `(exit − entry) / entry`, or `None` when that ratio is unavailable.
pub fn simple_return(entry_price: f64, exit_price: f64) -> Option<f64> {
    if entry_price == 0.0 {
        return None;
    }
    let r = (exit_price - entry_price) / entry_price;
    r.is_finite().then_some(r)
}
