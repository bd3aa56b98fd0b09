//! Discrete advisory state emitted per bar.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-bar advisory. Persists across bars until the signal scan flips it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalState {
    #[default]
    Hold,
    Buy,
    Sell,
}

impl SignalState {
    /// Direction of the position this state holds, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            SignalState::Hold => None,
            SignalState::Buy => Some(Direction::Long),
            SignalState::Sell => Some(Direction::Short),
        }
    }

    pub fn is_hold(self) -> bool {
        self == SignalState::Hold
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalState::Hold => "hold",
            SignalState::Buy => "buy",
            SignalState::Sell => "sell",
        };
        f.write_str(s)
    }
}

/// Side of a trade segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for long, −1 for short. A short segment profits when price falls.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("long"),
            Direction::Short => f.write_str("short"),
        }
    }
}
