//! One-shot computation of every indicator and metric for a price series.

use crate::domain::indicator::{
    self, IndicatorSeries, IndicatorType, bollinger, macd, rsi,
};
use crate::domain::metrics::{self, Summary, TRADING_DAYS_PER_YEAR};
use crate::domain::ohlcv::PricePoint;
use crate::domain::returns;
use std::collections::HashMap;

pub const DEFAULT_MA_PERIODS: [usize; 3] = [5, 25, 75];

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub ma_periods: Vec<usize>,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub trading_days: usize,
    pub risk_free_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ma_periods: DEFAULT_MA_PERIODS.to_vec(),
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_mult: bollinger::DEFAULT_MULT_X100 as f64 / 100.0,
            trading_days: TRADING_DAYS_PER_YEAR,
            risk_free_rate: 0.0,
        }
    }
}

impl AnalysisConfig {
    /// Indicator columns in output order.
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        let mut types: Vec<IndicatorType> =
            self.ma_periods.iter().map(|&p| IndicatorType::Sma(p)).collect();
        types.push(IndicatorType::Rsi(self.rsi_period));
        types.push(IndicatorType::Macd {
            fast: self.macd_fast,
            slow: self.macd_slow,
            signal: self.macd_signal,
        });
        types.push(IndicatorType::bollinger(
            self.bollinger_period,
            self.bollinger_mult,
        ));
        types.push(IndicatorType::Returns);
        types
    }
}

/// Computes a single indicator over `bars`.
pub fn compute_indicator(bars: &[PricePoint], indicator_type: &IndicatorType) -> IndicatorSeries {
    match *indicator_type {
        IndicatorType::Sma(p) => indicator::calculate_sma(bars, p),
        IndicatorType::Ema(p) => indicator::calculate_ema(bars, p),
        IndicatorType::Rsi(p) => indicator::calculate_rsi(bars, p),
        IndicatorType::Stddev(p) => indicator::calculate_stddev(bars, p),
        IndicatorType::Macd { fast, slow, signal } => {
            indicator::calculate_macd(bars, fast, slow, signal)
        }
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => indicator::calculate_bollinger(bars, period, stddev_mult_x100),
        IndicatorType::Returns => returns::calculate_returns(bars),
        IndicatorType::MonthlyReturns => returns::calculate_monthly_returns(bars),
    }
}

/// Computes each requested indicator once, keyed by type.
pub fn compute_indicators(
    bars: &[PricePoint],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for t in types {
        if !out.contains_key(t) {
            out.insert(t.clone(), compute_indicator(bars, t));
        }
    }
    out
}

/// The price series' derived columns plus scalar metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub indicators: Vec<IndicatorSeries>,
    pub monthly_returns: IndicatorSeries,
    pub volatility: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub summary: Summary,
}

impl Analysis {
    pub fn compute(bars: &[PricePoint], config: &AnalysisConfig) -> Self {
        let mut indicators: Vec<IndicatorSeries> = Vec::new();
        for t in config.indicator_types() {
            if indicators.iter().all(|s| s.indicator_type != t) {
                indicators.push(compute_indicator(bars, &t));
            }
        }

        let daily = indicators
            .iter()
            .find(|s| s.indicator_type == IndicatorType::Returns)
            .cloned()
            .unwrap_or_else(|| returns::calculate_returns(bars));

        Analysis {
            volatility: metrics::annualized_volatility(&daily, config.trading_days),
            sharpe_ratio: metrics::sharpe_ratio(
                &daily,
                config.trading_days,
                config.risk_free_rate,
            ),
            monthly_returns: returns::calculate_monthly_returns(bars),
            summary: Summary::compute(bars),
            indicators,
        }
    }

    pub fn get(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators
            .iter()
            .find(|s| &s.indicator_type == indicator_type)
    }

    /// Column headers for the indicator part of an exported row.
    pub fn column_names(&self) -> Vec<String> {
        self.indicators
            .iter()
            .flat_map(|s| s.indicator_type.column_names())
            .collect()
    }

    /// Indicator cells for bar `index`, one per column.
    pub fn row(&self, index: usize) -> Vec<Option<f64>> {
        self.indicators
            .iter()
            .flat_map(|s| match s.values.get(index) {
                Some(point) => point.components(),
                None => vec![None; s.indicator_type.component_names().len()],
            })
            .collect()
    }
}
