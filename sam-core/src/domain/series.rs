//! PriceSeries: validated, time-ordered bars for one instrument.
//!
//! The only way to build a series is through [`PriceSeries::from_bars`] (or the
//! strict [`PriceSeries::new`]), so every series the engine sees already
//! satisfies the ordering invariant and contains no malformed bars.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::PriceBar;
use crate::fingerprint::DatasetHash;

/// Errors raised while validating raw bars into a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("timestamps must be strictly increasing: bar {index} at {current} follows {previous}")]
    NonIncreasingTimestamp {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("malformed bar {index} at {timestamp}: OHLC fields must be finite with high >= low")]
    MalformedBar {
        index: usize,
        timestamp: NaiveDateTime,
    },
}

/// What to do with a bar whose OHLC fields are NaN/infinite or inverted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedBarPolicy {
    /// Drop the bar and record it in [`ValidatedSeries::skipped`].
    #[default]
    Skip,
    /// Fail the whole series with [`SeriesError::MalformedBar`].
    Reject,
}

/// A bar dropped by the skip policy, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBar {
    /// Position in the raw input.
    pub input_index: usize,
    pub timestamp: NaiveDateTime,
}

/// Output of validation: the clean series plus whatever was skipped.
#[derive(Debug, Clone)]
pub struct ValidatedSeries {
    pub series: PriceSeries,
    pub skipped: Vec<SkippedBar>,
}

/// Ordered bars for a single instrument. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Strict constructor: any malformed bar is an error.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        Self::from_bars(symbol, bars, MalformedBarPolicy::Reject).map(|v| v.series)
    }

    /// Validate raw bars under the given malformed-bar policy.
    ///
    /// Timestamp ordering is always enforced on the bars that are kept: a
    /// duplicate or backwards timestamp is an upstream contract violation and
    /// is never skipped silently.
    pub fn from_bars(
        symbol: impl Into<String>,
        bars: Vec<PriceBar>,
        policy: MalformedBarPolicy,
    ) -> Result<ValidatedSeries, SeriesError> {
        let mut kept: Vec<PriceBar> = Vec::with_capacity(bars.len());
        let mut skipped = Vec::new();

        for (index, bar) in bars.into_iter().enumerate() {
            if bar.is_malformed() {
                match policy {
                    MalformedBarPolicy::Skip => {
                        tracing::warn!(index, timestamp = %bar.timestamp, "skipping malformed bar");
                        skipped.push(SkippedBar {
                            input_index: index,
                            timestamp: bar.timestamp,
                        });
                        continue;
                    }
                    MalformedBarPolicy::Reject => {
                        return Err(SeriesError::MalformedBar {
                            index,
                            timestamp: bar.timestamp,
                        });
                    }
                }
            }

            if let Some(prev) = kept.last() {
                if bar.timestamp <= prev.timestamp {
                    return Err(SeriesError::NonIncreasingTimestamp {
                        index,
                        previous: prev.timestamp,
                        current: bar.timestamp,
                    });
                }
            }
            kept.push(bar);
        }

        if kept.is_empty() {
            return Err(SeriesError::Empty);
        }

        Ok(ValidatedSeries {
            series: Self {
                symbol: symbol.into(),
                bars: kept,
            },
            skipped,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Series restricted to its first `len` bars. Used to check that outputs
    /// at index `i` never depend on bars after `i`.
    pub fn truncated(&self, len: usize) -> Self {
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[..len.min(self.bars.len())].to_vec(),
        }
    }

    /// BLAKE3 content hash over symbol, timestamps and the exact bit patterns
    /// of every price. Two series hash equal only if they are bit-identical.
    pub fn dataset_hash(&self) -> DatasetHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for bar in &self.bars {
            hasher.update(&bar.timestamp.and_utc().timestamp_micros().to_le_bytes());
            for v in [bar.open, bar.high, bar.low, bar.close] {
                hasher.update(&v.to_bits().to_le_bytes());
            }
            let volume_bits = bar.volume.map(f64::to_bits).unwrap_or(u64::MAX);
            hasher.update(&volume_bits.to_le_bytes());
        }
        DatasetHash(hasher.finalize().to_hex().to_string())
    }
}
