//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{Analysis, AnalysisConfig};
use crate::domain::config_validation::{
    build_analysis_config, parse_optional_date, validate_analysis_config, validate_series,
};
use crate::domain::error::AnalyzerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::export_port::ExportPort;

#[derive(Parser, Debug)]
#[command(name = "stockscope", about = "Technical indicators for daily price series")]
pub struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute indicators and metrics for one symbol
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Write the augmented table as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate an analysis configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            config,
            symbol,
            start,
            end,
            output,
        } => run_analyze(&config, symbol.as_deref(), start, end, output.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, AnalyzerError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// The `[data] path` directory as a CSV data source.
pub fn build_data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, AnalyzerError> {
    let path = config.require_string("data", "path")?;
    debug!(path = %path, "using CSV data directory");
    Ok(CsvAdapter::new(PathBuf::from(path)))
}

/// Symbols from `--symbol` or the comma-separated `[analysis] symbol` key.
///
/// Case is kept as written since symbols name files in the data directory.
pub fn resolve_symbols(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    let raw = match symbol_override {
        Some(s) => s.to_string(),
        None => config.get_string("analysis", "symbol").unwrap_or_default(),
    };

    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Date bounds from the command line, falling back to `[analysis]`.
pub fn resolve_range(
    config: &dyn ConfigPort,
    start_override: Option<NaiveDate>,
    end_override: Option<NaiveDate>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), AnalyzerError> {
    let start = match start_override {
        Some(d) => Some(d),
        None => parse_optional_date(config, "start_date")?,
    };
    let end = match end_override {
        Some(d) => Some(d),
        None => parse_optional_date(config, "end_date")?,
    };

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(AnalyzerError::ConfigInvalid {
                section: "analysis".into(),
                key: "start_date".into(),
                reason: format!("start {s} is after end {e}"),
            });
        }
    }
    Ok((start, end))
}

/// Fetch, validate, compute and optionally export one symbol.
pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    export: Option<(&dyn ExportPort, &Path)>,
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalyzerError> {
    let bars = data_port.fetch_prices(symbol, start, end)?;
    if bars.is_empty() {
        return Err(AnalyzerError::NoData {
            symbol: symbol.to_string(),
        });
    }
    info!("Loaded {} bars for {}", bars.len(), symbol);

    validate_series(&bars)?;

    let slowest = config
        .ma_periods
        .iter()
        .copied()
        .chain([config.bollinger_period, config.rsi_period + 1])
        .max()
        .unwrap_or(0);
    if bars.len() < slowest {
        warn!(
            bars = bars.len(),
            needed = slowest,
            "series shorter than the longest window; some indicators stay undefined"
        );
    }

    let analysis = Analysis::compute(&bars, config);

    if let Some((exporter, path)) = export {
        exporter.write(&bars, &analysis, path)?;
    }

    Ok(analysis)
}

fn fmt_opt(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| "n/a".to_string())
}

fn pct(v: f64) -> String {
    format!("{:+.2}%", v * 100.0)
}

/// Human-readable report printed by `analyze`.
pub fn format_report(symbol: &str, analysis: &Analysis) -> String {
    let s = &analysis.summary;
    let mut out = String::new();

    let _ = writeln!(out, "Symbol: {symbol}");
    if let (Some(first), Some(last)) = (s.first_date, s.last_date) {
        let _ = writeln!(out, "Period: {first} to {last} ({} bars)", s.bars);
    }
    let _ = writeln!(out, "Latest close: {}", fmt_opt(s.latest_close, |v| format!("{v:.2}")));
    let _ = writeln!(
        out,
        "Change: {} ({})",
        fmt_opt(s.change, |v| format!("{v:+.2}")),
        fmt_opt(s.change_pct, pct)
    );
    let _ = writeln!(
        out,
        "High / Low: {} / {}",
        fmt_opt(s.period_high, |v| format!("{v:.2}")),
        fmt_opt(s.period_low, |v| format!("{v:.2}"))
    );
    let _ = writeln!(
        out,
        "Average volume: {}",
        fmt_opt(s.average_volume, |v| format!("{v:.0}"))
    );
    let _ = writeln!(
        out,
        "Max drawdown: {} over {} bars",
        fmt_opt(s.max_drawdown, |v| format!("{:.2}%", v * 100.0)),
        s.max_drawdown_duration
    );
    let _ = writeln!(
        out,
        "Volatility (annualized): {}",
        fmt_opt(analysis.volatility, |v| format!("{:.2}%", v * 100.0))
    );
    let _ = writeln!(
        out,
        "Sharpe ratio: {}",
        fmt_opt(analysis.sharpe_ratio, |v| format!("{v:.2}"))
    );

    let _ = writeln!(out, "\nLatest indicators:");
    for series in &analysis.indicators {
        let Some(point) = series.values.last() else {
            continue;
        };
        for (name, value) in series
            .indicator_type
            .column_names()
            .iter()
            .zip(point.components())
        {
            let _ = writeln!(out, "  {name}: {}", fmt_opt(value, |v| format!("{v:.4}")));
        }
    }

    if !analysis.monthly_returns.is_empty() {
        let _ = writeln!(out, "\nMonthly returns:");
        for point in &analysis.monthly_returns.values {
            let _ = writeln!(
                out,
                "  {}: {}",
                point.date.format("%Y-%m"),
                fmt_opt(point.as_simple(), pct)
            );
        }
    }

    out
}

fn run_analyze(
    config_path: &Path,
    symbol_override: Option<&str>,
    start_override: Option<NaiveDate>,
    end_override: Option<NaiveDate>,
    output_path: Option<&Path>,
) -> Result<(), AnalyzerError> {
    let adapter = load_config(config_path)?;
    let analysis_config = build_analysis_config(&adapter)?;
    let data_port = build_data_port(&adapter)?;

    let symbols = resolve_symbols(symbol_override, &adapter);
    let symbol = match symbols.as_slice() {
        [] => {
            return Err(AnalyzerError::ConfigMissing {
                section: "analysis".into(),
                key: "symbol".into(),
            });
        }
        [only] => only.clone(),
        [first, ..] => {
            warn!("multiple symbols configured; analyzing {first} only");
            first.clone()
        }
    };

    let (start, end) = resolve_range(&adapter, start_override, end_override)?;
    info!("Analyzing {symbol}");

    let exporter = CsvExportAdapter::new();
    let export = output_path.map(|p| (&exporter as &dyn ExportPort, p));

    let analysis =
        run_analysis_pipeline(&data_port, export, &symbol, start, end, &analysis_config)?;
    print!("{}", format_report(&symbol, &analysis));
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), AnalyzerError> {
    let config = load_config(config_path)?;
    let data_port = build_data_port(&config)?;

    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        info!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        info!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> Result<(), AnalyzerError> {
    let config = load_config(config_path)?;
    let data_port = build_data_port(&config)?;

    let mut symbols = resolve_symbols(symbol_override, &config);
    if symbols.is_empty() {
        symbols = data_port.list_symbols()?;
    }

    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
            }
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), AnalyzerError> {
    let config = load_config(config_path)?;
    validate_analysis_config(&config)?;
    config.require_string("data", "path")?;

    let analysis_config = build_analysis_config(&config)?;
    eprintln!("Indicators:");
    for t in analysis_config.indicator_types() {
        eprintln!("  {}", t);
    }
    eprintln!(
        "Metrics: {} trading days, risk-free rate {}",
        analysis_config.trading_days, analysis_config.risk_free_rate
    );
    eprintln!("\nConfiguration is valid.");
    Ok(())
}
