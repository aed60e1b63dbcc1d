//! Divergence scanner
//!
//! Loads a candle file, computes RSI over the most recent window and reports
//! regular/hidden divergences between price and RSI.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use divergence_cli::{scan, ScanOutcome};
use divergence_config::{CandleFormat, CliConfigMerge, Settings};
use divergence_core::{
    Classification, DetectionObserver, NoopObserver, RunSeeding, ScanMode, Signal,
    TracingObserver,
};

/// Divergence scanner CLI
#[derive(Parser, Debug)]
#[command(
    name = "divergence-scan",
    version,
    about = "Detects RSI/price divergences in a candle file",
    long_about = "
Detects regular and hidden divergences between closing price and RSI.

Configuration is layered: defaults, then divergence.toml (or --config),
then DIVERGENCE_* environment variables, then the flags below.

Examples:
  divergence-scan --file data/btc_1h.json
  divergence-scan --file data/btc_4h.csv --period 4h --tail-gated
  divergence-scan --config scan.toml --json
"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Candle file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Candle file format (default: from the file extension)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Candle period: 15m, 1h, 4h or 1d
    #[arg(short, long)]
    period: Option<String>,

    /// Number of most recent candles to analyse
    #[arg(short, long)]
    window_size: Option<usize>,

    /// RSI lookback period
    #[arg(long)]
    rsi_period: Option<usize>,

    /// Extremum window half-width
    #[arg(short, long)]
    order: Option<usize>,

    /// Run length
    #[arg(short)]
    k: Option<usize>,

    /// Only report a signal from the most recent bars
    #[arg(long)]
    tail_gated: bool,

    /// Bars inspected in tail-gated mode
    #[arg(long)]
    tail_size: Option<usize>,

    /// Check both directions in tail-gated mode regardless of trend
    #[arg(long)]
    no_trend_gate: bool,

    /// Restart runs from the previous extremum, letting sealed runs overlap
    #[arg(long)]
    reseed: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging, including per-stage detection diagnostics
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for CandleFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => CandleFormat::Json,
            FormatArg::Csv => CandleFormat::Csv,
        }
    }
}

impl CliConfigMerge for Cli {
    fn merge_into_config(&self, config: &mut Settings) {
        if let Some(file) = &self.file {
            config.data.candle_file = file.clone();
            if let Some(format) = CandleFormat::from_path(file) {
                config.data.format = format;
            }
        }
        if let Some(format) = self.format {
            config.data.format = format.into();
        }
        if let Some(window_size) = self.window_size {
            config.data.window_size = window_size;
        }
        if let Some(rsi_period) = self.rsi_period {
            config.data.rsi_period = rsi_period;
        }
        if let Some(order) = self.order {
            config.detector.order = order;
        }
        if let Some(k) = self.k {
            config.detector.k = k;
        }
        if self.tail_gated {
            config.detector.scan_mode = ScanMode::TailGated;
        }
        if let Some(tail_size) = self.tail_size {
            config.detector.tail_size = tail_size;
        }
        if self.no_trend_gate {
            config.detector.require_trend_gate = false;
        }
        if self.reseed {
            config.detector.seeding = RunSeeding::Reseed;
        }
        if self.verbose {
            config.app.debug_mode = true;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::load()?,
    };
    let mut settings = settings.merge_cli_args(&cli);
    if let Some(period) = &cli.period {
        settings.data.set_period(period)?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.app.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let observer: Arc<dyn DetectionObserver> = if settings.app.is_debug() {
        Arc::new(TracingObserver)
    } else {
        Arc::new(NoopObserver)
    };

    let outcome = scan(&settings, observer)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&settings, &outcome);
    }

    Ok(())
}

fn print_summary(settings: &Settings, outcome: &ScanOutcome) {
    let report = &outcome.report;

    println!("📈 {} ({} min candles)", outcome.symbol, settings.data.interval_minutes);
    println!(
        "📂 Loaded {} candles, analysing the last {}",
        outcome.candles_loaded, outcome.window_size
    );
    println!(
        "🔧 order={} k={} rsi={} mode={:?}",
        settings.detector.order,
        settings.detector.k,
        settings.data.rsi_period,
        settings.detector.scan_mode
    );
    println!(
        "📊 Price extrema: {} highs, {} lows | RSI extrema: {} highs, {} lows",
        report.price_structure.maxima.len(),
        report.price_structure.minima.len(),
        report.oscillator_structure.maxima.len(),
        report.oscillator_structure.minima.len()
    );

    match &report.classification {
        Classification::Events(events) if events.is_empty() => {
            println!("\n➖ No divergences found");
        }
        Classification::Events(events) => {
            println!("\n🔍 {} divergence(s):", events.len());
            for event in events {
                let marker = if event.kind.is_bullish() { "🟢" } else { "🔴" };
                println!("  {} {}", marker, event);
            }
        }
        Classification::Signal(signal) => {
            let marker = match signal {
                Signal::Bullish => "🟢",
                Signal::Bearish => "🔴",
                Signal::Neutral => "➖",
            };
            println!("\n{} Signal: {} ({})", marker, signal, signal.as_i8());
        }
    }

    if report.collisions() > 0 || report.dropped() > 0 {
        println!(
            "\n⚠️  Label collisions: {}, dropped labels: {}",
            report.collisions(),
            report.dropped()
        );
    }
}
