//! SAM Core: composite technical scoring, signal scan and return evaluation.
//!
//! Pipeline for one price series, strictly forward:
//! - Feature extraction (moving averages, MACD, percentage change, ranges)
//! - Component scorers, each a bounded per-bar score from an ordered rule table
//! - Composite aggregation (the SAM series) and its moving-average trend line
//! - Signal scan: Buy/Sell/Hold with threshold hysteresis or confirmation count
//! - Return evaluation: trades, per-trade benchmark, summary vs buy-and-hold

pub mod composite;
pub mod config;
pub mod domain;
pub mod engine;
pub mod evaluation;
pub mod features;
pub mod fingerprint;
pub mod indicators;
pub mod scoring;
pub mod signal;

pub use config::{ConfigError, ConfigOverrides, EngineConfig};
pub use domain::{PriceBar, PriceSeries, SignalState, Trade};
pub use engine::{BarRow, Engine, EngineError, EngineReport};
pub use evaluation::Summary;
