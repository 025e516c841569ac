#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use stockscope::domain::error::AnalyzerError;
pub use stockscope::domain::ohlcv::PricePoint;
use stockscope::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, AnalyzerError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AnalyzerError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyzerError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, AnalyzerError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AnalyzerError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Bars with open=high=low=close on consecutive calendar days from 2024-01-01.
pub fn make_bars(closes: &[f64]) -> Vec<PricePoint> {
    make_bars_from(date("2024-01-01"), closes)
}

pub fn make_bars_from(start: NaiveDate, closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        })
        .collect()
}

/// The concrete scenario closes, padded to 30 points.
pub fn scenario_closes() -> Vec<f64> {
    vec![
        100.0, 102.0, 101.0, 105.0, 110.0, 108.0, 107.0, 106.0, 104.0, 103.0, 105.0, 107.0, 109.0,
        108.0, 111.0, 113.0, 112.0, 110.0, 114.0, 116.0, 115.0, 117.0, 119.0, 118.0, 120.0, 122.0,
        121.0, 119.0, 123.0, 125.0,
    ]
}

/// Hand-rolled adjust=False EMA used as the reference in tests.
pub fn reference_ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out: Vec<f64> = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        if i == 0 {
            out.push(v);
        } else {
            let prev = out[i - 1];
            out.push(alpha * v + (1.0 - alpha) * prev);
        }
    }
    out
}
