//! Exponentially Weighted Moving Average (EWMA).
//!
//! Span-parameterised: alpha = 2 / (span + 1). Two weighting modes:
//!
//! - `Recursive`: EWMA[t] = alpha * x[t] + (1 - alpha) * EWMA[t-1], seeded with
//!   the first defined value.
//! - `Adjusted`: weights (1 - alpha)^k normalised over all observations so far,
//!   which removes the seed bias on short histories.
//!
//! The recursion starts at the first defined input; the indicator masks the
//! first `span - 1` outputs as warmup.
//! Lookback: span - 1.

use serde::{Deserialize, Serialize};

use super::{closes, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EwmaMode {
    #[default]
    Recursive,
    Adjusted,
}

#[derive(Debug, Clone)]
pub struct Ewma {
    span: usize,
    mode: EwmaMode,
    name: String,
}

impl Ewma {
    pub fn new(span: usize, mode: EwmaMode) -> Self {
        assert!(span >= 1, "EWMA span must be >= 1");
        let suffix = match mode {
            EwmaMode::Recursive => "",
            EwmaMode::Adjusted => "_adj",
        };
        Self {
            span,
            mode,
            name: format!("ewma_{span}{suffix}"),
        }
    }
}

impl Indicator for Ewma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.span.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut result = ewma_of_series(&closes(bars), self.span, self.mode);
        mask_prefix(&mut result, self.lookback());
        result
    }
}

/// Raw EWMA of an arbitrary series, without warmup masking.
///
/// Leading NaNs stay NaN and the recursion starts at the first defined value.
/// After that point a NaN taints every later `Recursive` value. `Adjusted`
/// mode leaves the bar undefined, still decays the earlier weights across it,
/// and resumes on the next defined value.
pub fn ewma_of_series(values: &[f64], span: usize, mode: EwmaMode) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if span == 0 {
        return result;
    }

    let Some(start) = values.iter().position(|v| !v.is_nan()) else {
        return result;
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    match mode {
        EwmaMode::Recursive => {
            let mut prev = values[start];
            result[start] = prev;
            for i in (start + 1)..n {
                if values[i].is_nan() {
                    return result;
                }
                prev = alpha * values[i] + decay * prev;
                result[i] = prev;
            }
        }
        EwmaMode::Adjusted => {
            let mut num = 0.0;
            let mut den = 0.0;
            for i in start..n {
                if values[i].is_nan() {
                    num *= decay;
                    den *= decay;
                    continue;
                }
                num = values[i] + decay * num;
                den = 1.0 + decay * den;
                result[i] = num / den;
            }
        }
    }

    result
}

/// Overwrite the first `count` values with NaN.
pub(crate) fn mask_prefix(values: &mut [f64], count: usize) {
    for v in values.iter_mut().take(count) {
        *v = f64::NAN;
    }
}
