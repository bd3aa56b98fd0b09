//! SAM CLI: score a price series and export the signal timeline.
//!
//! Commands:
//! - `run`: load a CSV of bars, run the engine, write bars/trades/report artifacts
//! - `show`: print the summary of a saved run
//! - `config`: print the effective configuration as TOML

mod data_loader;
mod export;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sam_core::signal::SignalPolicy;
use sam_core::{ConfigOverrides, Engine, EngineConfig, EngineReport};
use tracing::{info, warn};

use crate::export::{save_artifacts, RunArtifact};

#[derive(Parser)]
#[command(name = "sam", about = "SAM: composite technical score and buy/sell/hold signals")]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence when set).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Shared configuration flags. File values are loaded first, flags override.
#[derive(clap::Args)]
struct ConfigArgs {
    /// Path to a TOML engine config. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum trend-line change that flips the signal.
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Moving-average window of the trend line.
    #[arg(long)]
    trend_window: Option<usize>,

    /// Signal policy.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Consecutive agreeing bars required by the confirmation policy.
    #[arg(long)]
    confirmations: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Hysteresis,
    Confirmation,
}

impl From<PolicyArg> for SignalPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Hysteresis => SignalPolicy::Hysteresis,
            PolicyArg::Confirmation => SignalPolicy::Confirmation,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score a CSV price series and write bars.csv, trades.csv and report.json.
    Run {
        /// CSV with timestamp,open,high,low,close[,volume] columns.
        input: PathBuf,

        /// Instrument symbol. Defaults to the input file stem.
        #[arg(long)]
        symbol: Option<String>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the summary stored in a run's report.json.
    Show {
        /// Directory written by `run`.
        run_dir: PathBuf,
    },
    /// Print the effective configuration (file plus overrides) as TOML.
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            symbol,
            output_dir,
            config,
        } => run_cmd(&input, symbol, &output_dir, &config),
        Commands::Show { run_dir } => {
            let artifact = export::load_artifacts(&run_dir)?;
            print_summary(&artifact.report, artifact.skipped_bars.len());
            Ok(())
        }
        Commands::Config { config } => {
            let config = resolve_config(&config)?;
            print!("{}", config.to_toml_string().context("failed to render config")?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &ConfigArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config.apply(&ConfigOverrides {
        sensitivity: args.sensitivity,
        trend_window: args.trend_window,
        policy: args.policy.map(SignalPolicy::from),
        confirmations: args.confirmations,
    });
    Ok(config)
}

fn run_cmd(input: &Path, symbol: Option<String>, output_dir: &Path, args: &ConfigArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let engine = Engine::new(config.clone()).context("invalid configuration")?;

    let symbol = symbol.unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    });

    let bars = data_loader::load_csv(input)?;
    info!(symbol = %symbol, rows = bars.len(), path = %input.display(), "loaded bars");

    let (report, skipped) = engine
        .run_bars(&symbol, bars)
        .with_context(|| format!("failed to score {symbol}"))?;
    if !skipped.is_empty() {
        warn!(count = skipped.len(), "malformed bars dropped from the series");
    }

    print_summary(&report, skipped.len());

    let artifact = RunArtifact::new(config, report, skipped);
    let run_dir = save_artifacts(&artifact, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

fn print_summary(report: &EngineReport, skipped: usize) {
    let summary = &report.summary;
    let period = match (report.rows.first(), report.rows.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first.timestamp, last.timestamp),
        _ => "-".to_string(),
    };

    println!();
    println!("=== SAM Result ===");
    println!("Symbol:         {}", report.fingerprint.symbol);
    println!("Run:            {}", report.fingerprint.run_id());
    println!("Period:         {period}");
    println!("Bars:           {} ({} warmup, {skipped} skipped)", report.rows.len(), report.warmup_bars);
    println!("Signal flips:   {}", report.flip_count());
    println!("Last signal:    {}", report.last_signal());
    println!("Trades:         {}", summary.trade_count);
    println!();
    println!("--- Returns ---");
    println!("Strategy:       {}", pct(Some(summary.strategy_return)));
    println!("Buy and hold:   {}", pct(summary.benchmark_return));
    println!("Excess:         {}", pct(summary.excess_return()));
    println!("Unrealized:     {}", pct(summary.unrealized_return));
    println!("Win rate:       {:.1}%", summary.win_rate() * 100.0);
    if summary.unavailable_returns > 0 {
        println!("WARNING: {} trade(s) with zero entry price excluded", summary.unavailable_returns);
    }
    if report.insufficient_data {
        println!("WARNING: series is not longer than the {}-bar warmup", report.warmup_bars);
    }
    println!();
}
