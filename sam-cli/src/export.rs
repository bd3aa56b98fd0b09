//! Artifact export: per-bar table, trade list and JSON report.
//!
//! A run writes three files into the output directory:
//! - `bars.csv`: timestamp, close, composite, trend, signal and every component score
//! - `trades.csv`: one row per signal segment
//! - `report.json`: the full [`RunArtifact`], versioned by `schema_version`
//!
//! Unknown schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sam_core::domain::{SkippedBar, TradeStatus};
use sam_core::{EngineConfig, EngineReport, Trade};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Everything needed to reproduce and inspect one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArtifact {
    pub schema_version: u32,
    pub run_id: String,
    pub config: EngineConfig,
    pub skipped_bars: Vec<SkippedBar>,
    pub report: EngineReport,
}

impl RunArtifact {
    pub fn new(config: EngineConfig, report: EngineReport, skipped_bars: Vec<SkippedBar>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            run_id: report.fingerprint.run_id(),
            config,
            skipped_bars,
            report,
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(artifact: &RunArtifact) -> Result<String> {
    serde_json::to_string_pretty(artifact).context("failed to serialize run report to JSON")
}

pub fn import_json(json: &str) -> Result<RunArtifact> {
    let artifact: RunArtifact =
        serde_json::from_str(json).context("failed to deserialize run report from JSON")?;
    if artifact.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            artifact.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(artifact)
}

// ─── CSV ────────────────────────────────────────────────────────────

fn opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

/// Per-bar table. Undefined values are written as empty fields.
///
/// Columns: index, timestamp, close, composite, trend, signal, then one
/// column per component scorer.
pub fn export_bars_csv(report: &EngineReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = vec!["index", "timestamp", "close", "composite", "trend", "signal"];
    header.extend(report.components.iter().map(|c| c.name.as_str()));
    wtr.write_record(&header)?;

    for row in &report.rows {
        let mut record = vec![
            row.index.to_string(),
            row.timestamp.to_string(),
            format!("{:.6}", row.close),
            opt(row.composite),
            opt(row.trend),
            row.signal.to_string(),
        ];
        record.extend(report.components.iter().map(|c| opt(c.get(row.index))));
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Trade list. Returns are percentages; an unavailable return is empty.
///
/// Columns: direction, entry_index, entry_time, entry_price, exit_index,
/// exit_time, exit_price, bars_held, status, return_pct, benchmark_pct
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "direction",
        "entry_index",
        "entry_time",
        "entry_price",
        "exit_index",
        "exit_time",
        "exit_price",
        "bars_held",
        "status",
        "return_pct",
        "benchmark_pct",
    ])?;

    for t in trades {
        let status = match t.status {
            TradeStatus::Closed => "closed",
            TradeStatus::Open => "open",
        }
        .to_string();
        wtr.write_record([
            &t.direction.to_string(),
            &t.entry_index.to_string(),
            &t.entry_time.to_string(),
            &format!("{:.6}", t.entry_price),
            &t.exit_index.to_string(),
            &t.exit_time.to_string(),
            &format!("{:.6}", t.exit_price),
            &t.bars_held.to_string(),
            &status,
            &t.return_pct().map(|v| format!("{v:.4}")).unwrap_or_default(),
            &t.benchmark_pct().map(|v| format!("{v:.4}")).unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `bars.csv`, `trades.csv` and `report.json` into `output_dir`,
/// creating it if needed. Returns the directory.
pub fn save_artifacts(artifact: &RunArtifact, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let files = [
        ("bars.csv", export_bars_csv(&artifact.report)?),
        ("trades.csv", export_trades_csv(&artifact.report.trades)?),
        ("report.json", export_json(artifact)?),
    ];
    for (name, contents) in files {
        let path = output_dir.join(name);
        std::fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(output_dir.to_path_buf())
}

pub fn load_artifacts(dir: &Path) -> Result<RunArtifact> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
