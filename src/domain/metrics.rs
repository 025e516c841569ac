//! Risk metrics and period summary statistics.

use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::indicator::{IndicatorSeries, finite};
use crate::domain::ohlcv::PricePoint;
use crate::domain::returns::pct_change;
use chrono::NaiveDate;

pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Sample standard deviation of the defined returns, annualized.
///
/// `None` with fewer than two defined returns. A flat series is `Some(0.0)`.
pub fn annualized_volatility(returns: &IndicatorSeries, trading_days: usize) -> Option<f64> {
    let valid = returns.valid_simple_values();
    let stddev = sample_stddev(&valid)?;
    finite(stddev * (trading_days as f64).sqrt())
}

/// (mean - rf / days) / stddev * sqrt(days) over the defined returns.
///
/// `None` with fewer than two defined returns, zero dispersion, or zero days.
pub fn sharpe_ratio(
    returns: &IndicatorSeries,
    trading_days: usize,
    risk_free_rate: f64,
) -> Option<f64> {
    if trading_days == 0 {
        return None;
    }
    let valid = returns.valid_simple_values();
    let stddev = sample_stddev(&valid)?;
    if stddev <= 0.0 {
        return None;
    }

    let days = trading_days as f64;
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let excess_return = mean - risk_free_rate / days;
    finite(excess_return / stddev * days.sqrt())
}

/// Largest peak-to-trough decline of closes as a fraction of the peak, and
/// the longest run of bars spent below a prior peak.
pub fn compute_drawdown(bars: &[PricePoint]) -> (f64, usize) {
    let Some(first) = bars.first() else {
        return (0.0, 0);
    };

    let mut peak = first.close;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for bar in bars {
        if bar.close >= peak {
            peak = bar.close;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - bar.close) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}

/// Headline figures for a price series over its whole span.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub bars: usize,
    pub latest_close: Option<f64>,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub period_high: Option<f64>,
    pub period_low: Option<f64>,
    pub average_volume: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub max_drawdown_duration: usize,
}

impl Summary {
    pub fn compute(bars: &[PricePoint]) -> Self {
        let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
            return Summary::default();
        };

        let period_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let period_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let average_volume = bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64;
        let (max_dd, max_dd_duration) = compute_drawdown(bars);

        Summary {
            first_date: Some(first.date),
            last_date: Some(last.date),
            bars: bars.len(),
            latest_close: Some(last.close),
            change: finite(last.close - first.close),
            change_pct: pct_change(first.close, last.close).and_then(finite),
            period_high: finite(period_high),
            period_low: finite(period_low),
            average_volume: finite(average_volume),
            max_drawdown: finite(max_dd),
            max_drawdown_duration: max_dd_duration,
        }
    }
}
