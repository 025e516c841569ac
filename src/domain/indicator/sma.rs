//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PricePoint;

/// Rolling mean over `values`; `None` where the window is not full.
pub(crate) fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            Some(window.iter().sum::<f64>() / period as f64)
        })
        .collect()
}

pub fn calculate_sma(bars: &[PricePoint], period: usize) -> IndicatorSeries {
    let closes = PricePoint::closes(bars);
    let values = bars
        .iter()
        .zip(rolling_mean(&closes, period))
        .map(|(bar, mean)| IndicatorPoint::simple(bar.date, mean))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
