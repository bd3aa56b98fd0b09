//! Run fingerprinting: deterministic identification of engine inputs.
//!
//! - `ConfigHash`: BLAKE3 of the canonical JSON form of an `EngineConfig`.
//! - `DatasetHash`: BLAKE3 of the bar data (see `PriceSeries::dataset_hash`).
//! - `RunFingerprint`: both hashes plus the bar count, attached to every
//!   report. Two reports with equal fingerprints came from identical inputs
//!   and must be bit-identical.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact identity of an engine configuration (every parameter value).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

impl ConfigHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    /// Hash the JSON form of any serializable value. Struct fields serialize
    /// in declaration order, so the text is canonical for a given type.
    pub fn of<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_vec(value)?;
        Ok(Self::from_bytes(&json))
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash of a price series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub symbol: String,
    pub bars: usize,
    pub config_hash: ConfigHash,
    pub dataset_hash: DatasetHash,
}

impl RunFingerprint {
    /// Short stable run id: BLAKE3 over both hashes.
    pub fn run_id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.config_hash.0.as_bytes());
        hasher.update(b":");
        hasher.update(self.dataset_hash.0.as_bytes());
        let hex = hasher.finalize().to_hex();
        hex.as_str()[..16].to_string()
    }
}

impl fmt::Display for RunFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.symbol, self.bars, self.run_id())
    }
}
