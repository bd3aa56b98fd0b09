//! Engine configuration: TOML-loadable, validated before any computation.
//!
//! ```toml
//! [signal]
//! policy = "hysteresis"
//! sensitivity = 0.1
//!
//! [aggregation]
//! mode = "sum"
//! undefined = "zero_fill"
//! trend_window = 12
//!
//! [evaluation]
//! open_position = "force_close"
//! aggregation = "compound"
//!
//! [data]
//! malformed_bars = "skip"
//!
//! [[scorers]]
//! kind = "pattern"
//!
//! [[scorers]]
//! kind = "growth"
//! window = 18
//! threshold = 0.0015
//! ```
//!
//! Every section is optional; a missing `scorers` array means the default
//! SAM composite.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composite::AggregationConfig;
use crate::domain::MalformedBarPolicy;
use crate::evaluation::EvaluationConfig;
use crate::fingerprint::ConfigHash;
use crate::scoring::{default_scorers, ScorerConfig};
use crate::signal::{SignalConfig, SignalPolicy};

/// Configuration problems. All of them are fatal and raised before the
/// engine touches any data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sensitivity must be a finite number > 0, got {0}")]
    InvalidSensitivity(f64),

    #[error("{field} must be >= 1")]
    ZeroWindow { field: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("at least one scorer must be configured")]
    NoScorers,

    #[error("confirmations must be >= 1")]
    ZeroConfirmations,

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Input-data handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub malformed_bars: MalformedBarPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub signal: SignalConfig,
    pub aggregation: AggregationConfig,
    pub evaluation: EvaluationConfig,
    pub data: DataConfig,
    pub scorers: Vec<ScorerConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signal: SignalConfig::default(),
            aggregation: AggregationConfig::default(),
            evaluation: EvaluationConfig::default(),
            data: DataConfig::default(),
            scorers: default_scorers(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML (used by the CLI to record the effective config).
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every value before anything is computed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signal.validate()?;
        self.aggregation.validate()?;
        if self.scorers.is_empty() {
            return Err(ConfigError::NoScorers);
        }
        for scorer in &self.scorers {
            scorer.validate()?;
        }
        Ok(())
    }

    /// BLAKE3 over the canonical JSON form; changes with any parameter.
    pub fn config_hash(&self) -> Result<ConfigHash, ConfigError> {
        Ok(ConfigHash::of(self)?)
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(s) = overrides.sensitivity {
            self.signal.sensitivity = s;
        }
        if let Some(w) = overrides.trend_window {
            self.aggregation.trend_window = w;
        }
        if let Some(p) = overrides.policy {
            self.signal.policy = p;
        }
        if let Some(c) = overrides.confirmations {
            self.signal.confirmations = c;
        }
    }
}

/// Values set on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub sensitivity: Option<f64>,
    pub trend_window: Option<usize>,
    pub policy: Option<SignalPolicy>,
    pub confirmations: Option<usize>,
}
