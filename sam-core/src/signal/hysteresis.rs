//! Threshold hysteresis on the trend line.
//!
//! delta = trend[i] - trend[i-1]; Buy if delta > s, Sell if delta < -s,
//! otherwise the previous state. Needs both trend values defined; until then
//! the previous state (Hold at the start) is kept.

use super::{ScanInput, ScanState};
use crate::domain::SignalState;

pub fn next_state(state: &ScanState, input: &ScanInput, sensitivity: f64) -> SignalState {
    let (Some(current), Some(previous)) = (input.trend, state.previous_trend) else {
        return state.previous_signal;
    };

    let delta = current - previous;
    if delta > sensitivity {
        SignalState::Buy
    } else if delta < -sensitivity {
        SignalState::Sell
    } else {
        state.previous_signal
    }
}
