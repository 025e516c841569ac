//! CLI integration tests for the analyze command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_analysis_config, resolve_symbols, resolve_range)
//! - Full pipeline with MockDataPort
//! - End-to-end with real CSV files and CSV export on disk
//! - Report formatting

mod common;

use common::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use stockscope::adapters::csv_adapter::CsvAdapter;
use stockscope::adapters::csv_export_adapter::CsvExportAdapter;
use stockscope::adapters::file_config_adapter::FileConfigAdapter;
use stockscope::cli;
use stockscope::domain::analysis::AnalysisConfig;
use stockscope::domain::config_validation::build_analysis_config;
use stockscope::domain::error::AnalyzerError;
use stockscope::domain::indicator::IndicatorType;
use stockscope::ports::export_port::ExportPort;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[data]
path = /tmp/stockscope-prices

[analysis]
symbol = 7203
start_date = 2024-01-01
end_date = 2024-12-31

[indicators]
ma_periods = 5, 25, 75
rsi_period = 14
macd_fast = 12
macd_slow = 26
macd_signal = 9
bollinger_period = 20
bollinger_mult = 2

[metrics]
trading_days = 252
risk_free_rate = 0.0
"#;

fn write_price_csv(dir: &Path, symbol: &str, bars: &[PricePoint]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}

mod config_loading {
    use super::*;

    #[test]
    fn build_analysis_config_from_full_file() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(file.path()).unwrap();
        let config = build_analysis_config(&adapter).unwrap();

        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn load_config_missing_file() {
        let err = cli::load_config(Path::new("/nonexistent/stockscope.ini")).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigParse { .. }));
    }

    #[test]
    fn resolve_symbols_prefers_override() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert_eq!(cli::resolve_symbols(Some(" aapl "), &adapter), vec!["aapl"]);
        assert_eq!(cli::resolve_symbols(None, &adapter), vec!["7203"]);
    }

    #[test]
    fn resolve_symbols_splits_lists() {
        let adapter =
            FileConfigAdapter::from_string("[analysis]\nsymbol = msft, goog ,,\n").unwrap();
        assert_eq!(cli::resolve_symbols(None, &adapter), vec!["msft", "goog"]);

        let empty = FileConfigAdapter::from_string("[analysis]\n").unwrap();
        assert!(cli::resolve_symbols(None, &empty).is_empty());
    }

    #[test]
    fn resolve_range_uses_config_then_overrides() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();

        let (start, end) = cli::resolve_range(&adapter, None, None).unwrap();
        assert_eq!(start, Some(date("2024-01-01")));
        assert_eq!(end, Some(date("2024-12-31")));

        let (start, end) = cli::resolve_range(&adapter, Some(date("2024-06-01")), None).unwrap();
        assert_eq!(start, Some(date("2024-06-01")));
        assert_eq!(end, Some(date("2024-12-31")));
    }

    #[test]
    fn resolve_range_rejects_inverted_override() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let err = cli::resolve_range(&adapter, Some(date("2025-06-01")), None).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn build_data_port_requires_path() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nsymbol = X\n").unwrap();
        let err = cli::build_data_port(&adapter).err().unwrap();
        assert!(matches!(err, AnalyzerError::ConfigMissing { key, .. } if key == "path"));
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn pipeline_computes_analysis() {
        let bars = make_bars(&scenario_closes());
        let port = MockDataPort::new().with_bars("7203", bars.clone());

        let analysis = cli::run_analysis_pipeline(
            &port,
            None,
            "7203",
            None,
            None,
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(analysis.summary.bars, bars.len());
        assert_eq!(analysis.summary.latest_close, Some(125.0));
        assert!(analysis.volatility.is_some());
        assert!(analysis.sharpe_ratio.is_some());
        let sma5 = analysis.get(&IndicatorType::Sma(5)).unwrap();
        assert_eq!(sma5.leading_undefined(), 4);
    }

    #[test]
    fn pipeline_respects_date_range() {
        let bars = make_bars(&scenario_closes());
        let port = MockDataPort::new().with_bars("7203", bars);

        let analysis = cli::run_analysis_pipeline(
            &port,
            None,
            "7203",
            Some(date("2024-01-05")),
            Some(date("2024-01-14")),
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(analysis.summary.bars, 10);
        assert_eq!(analysis.summary.first_date, Some(date("2024-01-05")));
    }

    #[test]
    fn pipeline_no_data() {
        let port = MockDataPort::new();
        let err = cli::run_analysis_pipeline(
            &port,
            None,
            "NONE",
            None,
            None,
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::NoData { symbol } if symbol == "NONE"));
    }

    #[test]
    fn pipeline_propagates_data_errors() {
        let port = MockDataPort::new().with_error("BAD", "connection refused");
        let err = cli::run_analysis_pipeline(
            &port,
            None,
            "BAD",
            None,
            None,
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::Data { .. }));
    }

    #[test]
    fn pipeline_rejects_unordered_series() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars.swap(0, 2);
        let port = MockDataPort::new().with_bars("X", bars);
        let err = cli::run_analysis_pipeline(
            &port,
            None,
            "X",
            None,
            None,
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidSeries { .. }));
    }

    #[test]
    fn pipeline_exports_when_requested() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("7203_indicators.csv");
        let port = MockDataPort::new().with_bars("7203", make_bars(&scenario_closes()));
        let exporter = CsvExportAdapter::new();

        cli::run_analysis_pipeline(
            &port,
            Some((&exporter as &dyn ExportPort, out.as_path())),
            "7203",
            None,
            None,
            &AnalysisConfig::default(),
        )
        .unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), scenario_closes().len() + 1);
        assert!(text.lines().next().unwrap().starts_with("date,open,high,low,close,volume,SMA(5)"));
    }
}

mod end_to_end {
    use super::*;
    use stockscope::ports::data_port::DataPort;

    #[test]
    fn csv_directory_round_trip() {
        let dir = TempDir::new().unwrap();
        let bars = make_bars_from(date("2024-01-01"), &scenario_closes());
        write_price_csv(dir.path(), "7203", &bars);
        write_price_csv(dir.path(), "6758", &bars[..5]);

        let port = CsvAdapter::new(dir.path().to_path_buf());
        assert_eq!(port.list_symbols().unwrap(), vec!["6758", "7203"]);
        assert_eq!(
            port.get_data_range("6758").unwrap(),
            Some((date("2024-01-01"), date("2024-01-05"), 5))
        );

        let out = dir.path().join("out.csv");
        let exporter = CsvExportAdapter::new();
        let analysis = cli::run_analysis_pipeline(
            &port,
            Some((&exporter as &dyn ExportPort, out.as_path())),
            "7203",
            None,
            None,
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(analysis.summary.bars, 30);
        let mut rdr = csv::Reader::from_path(&out).unwrap();
        let headers = rdr.headers().unwrap().clone();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 30);

        let sma75 = headers.iter().position(|h| h == "SMA(75)").unwrap();
        assert!(rows.iter().all(|r| r.get(sma75) == Some("")));

        let sma5 = headers.iter().position(|h| h == "SMA(5)").unwrap();
        assert_eq!(rows[3].get(sma5), Some(""));
        let expected: f64 = (100.0 + 102.0 + 101.0 + 105.0 + 110.0) / 5.0;
        let got: f64 = rows[4].get(sma5).unwrap().parse().unwrap();
        assert!((got - expected).abs() < 1e-9);
    }
}

mod symbol_case {
    use super::*;
    use stockscope::ports::data_port::DataPort;

    #[test]
    fn listed_lowercase_symbol_can_be_analyzed() {
        let dir = TempDir::new().unwrap();
        write_price_csv(dir.path(), "msft", &make_bars(&scenario_closes()));
        let port = CsvAdapter::new(dir.path().to_path_buf());

        let listed = port.list_symbols().unwrap();
        assert_eq!(listed, vec!["msft"]);

        let adapter = FileConfigAdapter::from_string("[analysis]\n").unwrap();
        let symbols = cli::resolve_symbols(Some(&listed.join(",")), &adapter);
        assert_eq!(symbols, vec!["msft"]);

        let analysis = cli::run_analysis_pipeline(
            &port,
            None,
            &symbols[0],
            None,
            None,
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert_eq!(analysis.summary.bars, 30);
    }

    #[test]
    fn mixed_case_symbol_from_config_is_kept() {
        let dir = TempDir::new().unwrap();
        write_price_csv(dir.path(), "BRK.b", &make_bars(&[100.0, 101.0, 102.0]));
        let port = CsvAdapter::new(dir.path().to_path_buf());

        let adapter = FileConfigAdapter::from_string("[analysis]\nsymbol = BRK.b\n").unwrap();
        let symbols = cli::resolve_symbols(None, &adapter);
        assert_eq!(symbols, vec!["BRK.b"]);
        assert_eq!(
            port.get_data_range(&symbols[0]).unwrap(),
            Some((date("2024-01-01"), date("2024-01-03"), 3))
        );
    }
}

mod report {
    use super::*;
    use stockscope::domain::analysis::Analysis;

    #[test]
    fn report_contains_headline_figures() {
        let bars = make_bars(&scenario_closes());
        let analysis = Analysis::compute(&bars, &AnalysisConfig::default());
        let report = cli::format_report("7203", &analysis);

        assert!(report.contains("Symbol: 7203"));
        assert!(report.contains("Period: 2024-01-01 to 2024-01-30 (30 bars)"));
        assert!(report.contains("Latest close: 125.00"));
        assert!(report.contains("Change: +25.00 (+25.00%)"));
        assert!(report.contains("SMA(75): n/a"));
        assert!(report.contains("MACD(12,26,9).signal:"));
        assert!(report.contains("2024-01: n/a"));
    }

    #[test]
    fn report_for_flat_series_marks_undefined_sharpe() {
        let analysis = Analysis::compute(&make_bars(&[10.0; 30]), &AnalysisConfig::default());
        let report = cli::format_report("FLAT", &analysis);

        assert!(report.contains("Volatility (annualized): 0.00%"));
        assert!(report.contains("Sharpe ratio: n/a"));
    }
}
