//! Daily and monthly percentage returns.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PricePoint;
use chrono::{Datelike, NaiveDate};

/// (curr - prev) / prev, undefined for a zero previous value.
pub fn pct_change(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 {
        None
    } else {
        Some((curr - prev) / prev)
    }
}

/// Day-over-day close returns. The first bar has no predecessor and is undefined.
pub fn calculate_returns(bars: &[PricePoint]) -> IndicatorSeries {
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let ret = if i == 0 {
                None
            } else {
                pct_change(bars[i - 1].close, bar.close)
            };
            IndicatorPoint::simple(bar.date, ret)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Returns,
        values,
    }
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Last close per calendar month, labelled with the month-end date.
pub fn resample_month_end(bars: &[PricePoint]) -> Vec<(NaiveDate, f64)> {
    let mut months: Vec<(NaiveDate, f64)> = Vec::new();
    for bar in bars {
        let label = month_end(bar.date);
        match months.last_mut() {
            Some((last, close)) if *last == label => *close = bar.close,
            _ => months.push((label, bar.close)),
        }
    }
    months
}

/// Month-over-month return of month-end closes. One point per month with
/// data; the first month is undefined and months without bars are skipped.
pub fn calculate_monthly_returns(bars: &[PricePoint]) -> IndicatorSeries {
    let months = resample_month_end(bars);

    let values = months
        .iter()
        .enumerate()
        .map(|(i, &(label, close))| {
            let ret = if i == 0 {
                None
            } else {
                pct_change(months[i - 1].1, close)
            };
            IndicatorPoint::simple(label, ret)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::MonthlyReturns,
        values,
    }
}
