//! CSV bar loading for the CLI.
//!
//! Expected header: `timestamp,open,high,low,close[,volume]`. Column names are
//! matched case-insensitively and `date` is accepted in place of `timestamp`.
//! Extra columns are ignored. Empty numeric fields load as NaN so the engine's
//! malformed-bar policy decides what happens to them.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use sam_core::PriceBar;

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| anyhow!("missing required column '{}'", names[0]))
        };
        Ok(Self {
            timestamp: require(&["timestamp", "date"])?,
            open: require(&["open"])?,
            high: require(&["high"])?,
            low: require(&["low"])?,
            close: require(&["close"])?,
            volume: find(&["volume"]),
        })
    }
}

/// Load bars from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<Vec<PriceBar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open price file {}", path.display()))?;
    read_bars(file).with_context(|| format!("failed to load bars from {}", path.display()))
}

/// Parse bars from any CSV reader. Rows are returned in file order; ordering
/// and malformed values are validated later by the engine.
pub fn read_bars<R: std::io::Read>(reader: R) -> Result<Vec<PriceBar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::from_headers(rdr.headers()?)?;

    let mut bars = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = record.with_context(|| format!("line {line}: unreadable record"))?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let timestamp =
            parse_timestamp(field(columns.timestamp)).with_context(|| format!("line {line}"))?;
        let price = |name: &str, i: usize| {
            parse_price(field(i)).with_context(|| format!("line {line}: bad {name} value"))
        };

        let mut bar = PriceBar::new(
            timestamp,
            price("open", columns.open)?,
            price("high", columns.high)?,
            price("low", columns.low)?,
            price("close", columns.close)?,
        );
        if let Some(i) = columns.volume {
            let volume = price("volume", i)?;
            if !volume.is_nan() {
                bar = bar.with_volume(volume);
            }
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        bail!("no data rows");
    }
    Ok(bars)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// RFC 3339 (converted to UTC).
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.naive_utc());
    }
    bail!("unrecognized timestamp '{text}'")
}

fn parse_price(text: &str) -> Result<f64> {
    if text.is_empty() {
        return Ok(f64::NAN);
    }
    text.parse::<f64>()
        .with_context(|| format!("'{text}' is not a number"))
}
