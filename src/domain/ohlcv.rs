//! Daily OHLCV price point.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PricePoint {
    /// high >= max(open, close) >= min(open, close) >= low
    pub fn is_well_formed(&self) -> bool {
        let body_high = self.open.max(self.close);
        let body_low = self.open.min(self.close);
        self.high >= body_high && body_low >= self.low
    }

    /// Closing prices of a series, in order.
    pub fn closes(bars: &[PricePoint]) -> Vec<f64> {
        bars.iter().map(|b| b.close).collect()
    }
}
