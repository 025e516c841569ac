//! Rolling Standard Deviation indicator.
//!
//! Sample standard deviation (divides by n-1) over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n-1))
//! Warmup: first (n-1) bars are invalid. A period below 2 is undefined everywhere.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, finite};
use crate::domain::ohlcv::PricePoint;

/// Sample standard deviation of a slice, `None` for fewer than two values.
pub(crate) fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    finite(variance.sqrt())
}

pub(crate) fn rolling_sample_stddev(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                sample_stddev(&values[i + 1 - period..=i])
            }
        })
        .collect()
}

pub fn calculate_stddev(bars: &[PricePoint], period: usize) -> IndicatorSeries {
    let closes = PricePoint::closes(bars);
    let values = bars
        .iter()
        .zip(rolling_sample_stddev(&closes, period))
        .map(|(bar, sd)| IndicatorPoint::simple(bar.date, sd))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}
