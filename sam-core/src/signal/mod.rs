//! Signal generation: a single forward scan turning (composite, trend) into
//! a persistent Buy/Sell/Hold state per bar.
//!
//! The scan carries its state explicitly in [`ScanState`]. Each step sees
//! the current bar and the state left by the previous step, nothing else.
//! Two transition policies are available and never mixed:
//!
//! - **hysteresis** (default): flip when the one-bar change of the trend
//!   line exceeds `sensitivity`; sub-threshold moves keep the state.
//! - **confirmation**: flip after `confirmations` consecutive directional
//!   bars (composite and trend agree in sign) toward the current bar's side.
//!
//! While the scan runs it also records the trade segments: a new segment
//! opens on every flip to Buy or Sell, and the previous one closes at the
//! prior bar.

pub mod confirmation;
pub mod hysteresis;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::composite::CompositeSeries;
use crate::config::ConfigError;
use crate::domain::SignalState;

/// Which transition rule drives the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPolicy {
    #[default]
    Hysteresis,
    Confirmation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub policy: SignalPolicy,
    /// Minimum one-bar trend change that flips the state (hysteresis).
    pub sensitivity: f64,
    /// Consecutive agreeing bars needed to flip (confirmation).
    pub confirmations: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            policy: SignalPolicy::Hysteresis,
            sensitivity: 0.1,
            confirmations: 2,
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // infinity would also be written to JSON as null
        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(ConfigError::InvalidSensitivity(self.sensitivity));
        }
        if self.confirmations == 0 {
            return Err(ConfigError::ZeroConfirmations);
        }
        Ok(())
    }
}

/// One bar as the scan sees it.
#[derive(Debug, Clone, Copy)]
pub struct ScanInput {
    pub index: usize,
    pub composite: Option<f64>,
    pub trend: Option<f64>,
    pub close: f64,
}

/// Loop-carried scan state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanState {
    pub previous_signal: SignalState,
    pub previous_trend: Option<f64>,
    pub previous_close: Option<f64>,
    pub segment_start_index: Option<usize>,
    pub segment_start_price: Option<f64>,
    /// Directional bars seen since the last neutral bar or flip.
    pub streak: usize,
}

/// A contiguous run of one non-Hold state, as recorded by the scan.
///
/// `end_index` / `end_price` are `None` for a run still open at the last bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub state: SignalState,
    pub start_index: usize,
    pub start_price: f64,
    pub end_index: Option<usize>,
    pub end_price: Option<f64>,
}

impl Segment {
    pub fn is_open(&self) -> bool {
        self.end_index.is_none()
    }
}

/// Output of one scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalTimeline {
    pub states: Vec<SignalState>,
    pub segments: Vec<Segment>,
}

impl SignalTimeline {
    /// Number of bars whose state differs from the previous bar's.
    pub fn flip_count(&self) -> usize {
        self.states.windows(2).filter(|w| w[0] != w[1]).count()
    }
}

/// Decide the state for one bar under the configured policy.
fn candidate(state: &mut ScanState, input: &ScanInput, config: &SignalConfig) -> SignalState {
    match config.policy {
        SignalPolicy::Hysteresis => hysteresis::next_state(state, input, config.sensitivity),
        SignalPolicy::Confirmation => confirmation::next_state(state, input, config.confirmations),
    }
}

/// Advance the scan by one bar, recording segment boundaries.
pub fn step(
    state: &mut ScanState,
    input: &ScanInput,
    config: &SignalConfig,
    segments: &mut Vec<Segment>,
) -> SignalState {
    let next = candidate(state, input, config);

    if next != state.previous_signal {
        debug!(
            bar = input.index,
            from = %state.previous_signal,
            to = %next,
            trend = ?input.trend,
            "signal flip"
        );
        if let Some(open) = segments.last_mut().filter(|s| s.is_open()) {
            open.end_index = input.index.checked_sub(1);
            open.end_price = state.previous_close;
        }
        if next.is_hold() {
            state.segment_start_index = None;
            state.segment_start_price = None;
        } else {
            state.segment_start_index = Some(input.index);
            state.segment_start_price = Some(input.close);
            segments.push(Segment {
                state: next,
                start_index: input.index,
                start_price: input.close,
                end_index: None,
                end_price: None,
            });
        }
    }

    state.previous_signal = next;
    state.previous_trend = input.trend;
    state.previous_close = Some(input.close);
    next
}

/// Run the scan over a whole composite series.
///
/// `closes` must be aligned with `series`. The fold is strictly sequential;
/// each bar's state depends on the previous bar's.
pub fn generate_signals(series: &CompositeSeries, closes: &[f64], config: &SignalConfig) -> SignalTimeline {
    debug_assert_eq!(series.len(), closes.len());

    let mut state = ScanState::default();
    let mut segments = Vec::new();
    let states = closes
        .iter()
        .enumerate()
        .map(|(index, &close)| {
            let input = ScanInput {
                index,
                composite: series.composite.get(index).copied().flatten(),
                trend: series.trend.get(index).copied().flatten(),
                close,
            };
            step(&mut state, &input, config, &mut segments)
        })
        .collect();

    SignalTimeline { states, segments }
}
