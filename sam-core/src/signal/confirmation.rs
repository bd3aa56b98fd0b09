//! Confirmation-count policy.
//!
//! A bar is bullish when composite and trend are both above zero, bearish
//! when both are below. The streak counts consecutive directional bars of
//! either kind and clears on a bar of neither kind. Once it reaches
//! `confirmations`, the state flips to the current bar's side (unless it is
//! already there) and the count restarts.

use super::{ScanInput, ScanState};
use crate::domain::{Direction, SignalState};

fn bar_direction(input: &ScanInput) -> Option<Direction> {
    match (input.composite, input.trend) {
        (Some(c), Some(t)) if c > 0.0 && t > 0.0 => Some(Direction::Long),
        (Some(c), Some(t)) if c < 0.0 && t < 0.0 => Some(Direction::Short),
        _ => None,
    }
}

pub fn next_state(state: &mut ScanState, input: &ScanInput, confirmations: usize) -> SignalState {
    let Some(direction) = bar_direction(input) else {
        state.streak = 0;
        return state.previous_signal;
    };
    state.streak += 1;

    let target = match direction {
        Direction::Long => SignalState::Buy,
        Direction::Short => SignalState::Sell,
    };
    if state.streak >= confirmations && state.previous_signal != target {
        state.streak = 0;
        return target;
    }
    state.previous_signal
}
