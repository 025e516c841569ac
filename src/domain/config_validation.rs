//! Validation of analysis config and of caller-supplied price series.
//!
//! The indicator engine assumes a well-ordered series; these checks run in
//! the CLI before it hands bars to the engine.

use crate::domain::analysis::{AnalysisConfig, DEFAULT_MA_PERIODS};
use crate::domain::error::AnalyzerError;
use crate::domain::metrics::TRADING_DAYS_PER_YEAR;
use crate::domain::ohlcv::PricePoint;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use tracing::warn;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    validate_ma_periods(config)?;
    validate_periods(config)?;
    validate_macd_order(config)?;
    validate_bollinger_mult(config)?;
    validate_trading_days(config)?;
    validate_risk_free_rate(config)?;
    validate_dates(config)?;
    Ok(())
}

/// Builds an `AnalysisConfig` from the `[indicators]` and `[metrics]` sections.
pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, AnalyzerError> {
    validate_analysis_config(config)?;
    let defaults = AnalysisConfig::default();

    let period = |key: &str, default: usize| -> usize {
        config.get_int("indicators", key, default as i64) as usize
    };

    Ok(AnalysisConfig {
        ma_periods: parse_ma_periods(config)?,
        rsi_period: period("rsi_period", defaults.rsi_period),
        macd_fast: period("macd_fast", defaults.macd_fast),
        macd_slow: period("macd_slow", defaults.macd_slow),
        macd_signal: period("macd_signal", defaults.macd_signal),
        bollinger_period: period("bollinger_period", defaults.bollinger_period),
        bollinger_mult: config.get_double("indicators", "bollinger_mult", defaults.bollinger_mult),
        trading_days: config.get_int("metrics", "trading_days", defaults.trading_days as i64)
            as usize,
        risk_free_rate: config.get_double("metrics", "risk_free_rate", defaults.risk_free_rate),
    })
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> AnalyzerError {
    AnalyzerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_ma_periods(config: &dyn ConfigPort) -> Result<Vec<usize>, AnalyzerError> {
    let Some(raw) = config.get_string("indicators", "ma_periods") else {
        return Ok(DEFAULT_MA_PERIODS.to_vec());
    };

    let mut periods = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let period: usize = part
            .parse()
            .map_err(|_| invalid("indicators", "ma_periods", format!("'{part}' is not a period")))?;
        if period == 0 {
            return Err(invalid("indicators", "ma_periods", "periods must be at least 1"));
        }
        periods.push(period);
    }

    if periods.is_empty() {
        return Err(invalid("indicators", "ma_periods", "at least one period is required"));
    }
    Ok(periods)
}

fn validate_ma_periods(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    parse_ma_periods(config).map(|_| ())
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let defaults = AnalysisConfig::default();
    let keys = [
        ("rsi_period", defaults.rsi_period),
        ("macd_fast", defaults.macd_fast),
        ("macd_slow", defaults.macd_slow),
        ("macd_signal", defaults.macd_signal),
        ("bollinger_period", defaults.bollinger_period),
    ];

    for (key, default) in keys {
        if config.get_int("indicators", key, default as i64) < 1 {
            return Err(invalid("indicators", key, format!("{key} must be at least 1")));
        }
    }
    Ok(())
}

fn validate_macd_order(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let defaults = AnalysisConfig::default();
    let fast = config.get_int("indicators", "macd_fast", defaults.macd_fast as i64);
    let slow = config.get_int("indicators", "macd_slow", defaults.macd_slow as i64);
    if fast >= slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    Ok(())
}

fn validate_bollinger_mult(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let value = config.get_double("indicators", "bollinger_mult", 2.0);
    if !(value > 0.0 && value.is_finite()) {
        return Err(invalid(
            "indicators",
            "bollinger_mult",
            "bollinger_mult must be positive",
        ));
    }
    // Bands are keyed by the multiplier in hundredths.
    let hundredths = value * 100.0;
    if (hundredths - hundredths.round()).abs() > 1e-9 {
        return Err(invalid(
            "indicators",
            "bollinger_mult",
            "bollinger_mult allows at most two decimal places",
        ));
    }
    Ok(())
}

fn validate_trading_days(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let value = config.get_int("metrics", "trading_days", TRADING_DAYS_PER_YEAR as i64);
    if value < 1 {
        return Err(invalid("metrics", "trading_days", "trading_days must be at least 1"));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let value = config.get_double("metrics", "risk_free_rate", 0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "metrics",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "analysis",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

/// Reads an optional `%Y-%m-%d` date from the `[analysis]` section.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, AnalyzerError> {
    match config.get_string("analysis", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid("analysis", key, "expected YYYY-MM-DD format")),
    }
}

/// Checks the ordering and sign constraints the engine relies on.
///
/// OHLC relationships (high above the body, low below) are only warned
/// about; the engine tolerates them.
pub fn validate_series(bars: &[PricePoint]) -> Result<(), AnalyzerError> {
    let mut prev: Option<NaiveDate> = None;

    for bar in bars {
        if let Some(prev_date) = prev {
            if bar.date <= prev_date {
                return Err(AnalyzerError::InvalidSeries {
                    date: bar.date,
                    reason: format!("dates must be strictly increasing (previous {prev_date})"),
                });
            }
        }
        prev = Some(bar.date);

        let prices = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ];
        for (name, value) in prices {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalyzerError::InvalidSeries {
                    date: bar.date,
                    reason: format!("{name} must be a positive number, got {value}"),
                });
            }
        }

        if !(bar.volume.is_finite() && bar.volume >= 0.0) {
            return Err(AnalyzerError::InvalidSeries {
                date: bar.date,
                reason: format!("volume must be non-negative, got {}", bar.volume),
            });
        }

        if !bar.is_well_formed() {
            warn!(date = %bar.date, "bar high/low do not bracket open/close");
        }
    }

    Ok(())
}
