//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first value (no SMA seed), then
//! EMA[i] = V[i]*k + EMA[i-1]*(1-k).
//! No warmup: every bar is valid, early values simply carry more seed weight.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PricePoint;

/// Smoothing factor for a span of `period`.
pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Recursive EMA over raw values. Empty for a zero period.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }

    let k = smoothing_factor(period);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();

    if let Some(&first) = iter.next() {
        let mut ema = first;
        out.push(ema);
        for &v in iter {
            ema = v * k + ema * (1.0 - k);
            out.push(ema);
        }
    }

    out
}

pub fn calculate_ema(bars: &[PricePoint], period: usize) -> IndicatorSeries {
    let emas = ema_values(&PricePoint::closes(bars), period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint::simple(bar.date, emas.get(i).copied()))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
