//! RSI (Relative Strength Index) indicator implementation.
//!
//! Average gain/loss are plain rolling means over the last n price changes
//! (no Wilder smoothing):
//! - gain = max(change, 0), loss = max(-change, 0)
//! - avg = mean of the last n gains (losses)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100
//! If both are 0 the window is flat and RSI is undefined.
//!
//! Warmup: first n bars are invalid (need n price changes).

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PricePoint;

pub const DEFAULT_PERIOD: usize = 14;

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 { Some(100.0) } else { None }
    } else {
        Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
    }
}

pub fn calculate_rsi(bars: &[PricePoint], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);

    if period == 0 || bars.len() < 2 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint::simple(b.date, None))
            .collect();
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = bars
        .windows(2)
        .map(|w| {
            let change = w[1].close - w[0].close;
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    // Index j of gains/losses is the change into bar j + 1.
    let avg_gains = rolling_mean(&gains, period);
    let avg_losses = rolling_mean(&losses, period);

    let mut values = Vec::with_capacity(bars.len());
    values.push(IndicatorPoint::simple(bars[0].date, None));

    for (j, bar) in bars.iter().enumerate().skip(1) {
        let rsi = match (avg_gains[j - 1], avg_losses[j - 1]) {
            (Some(g), Some(l)) => rsi_from_averages(g, l),
            _ => None,
        };
        values.push(IndicatorPoint::simple(bar.date, rsi));
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
