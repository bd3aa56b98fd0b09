//! Domain types for the SAM engine.

pub mod bar;
pub mod series;
pub mod signal;
pub mod trade;

pub use bar::PriceBar;
pub use series::{MalformedBarPolicy, PriceSeries, SeriesError, SkippedBar, ValidatedSeries};
pub use signal::{Direction, SignalState};
pub use trade::{simple_return, Trade, TradeStatus};
