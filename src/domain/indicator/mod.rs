//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values, index-aligned to its bars
//!
//! A point with `valid == false` is undefined: the window behind it lacked
//! history or a denominator was zero. Its stored value is a placeholder and
//! is never exposed through the `Option` accessors.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Stddev(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Returns,
    MonthlyReturns,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

/// Maps non-finite results to the undefined marker.
pub(crate) fn finite(v: f64) -> Option<f64> {
    if v.is_finite() { Some(v) } else { None }
}

impl IndicatorValue {
    fn is_finite(&self) -> bool {
        match *self {
            IndicatorValue::Simple(v) => v.is_finite(),
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => line.is_finite() && signal.is_finite() && histogram.is_finite(),
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => upper.is_finite() && middle.is_finite() && lower.is_finite(),
        }
    }

    /// Same shape with every component set to zero.
    pub fn zeroed(&self) -> Self {
        match self {
            IndicatorValue::Simple(_) => IndicatorValue::Simple(0.0),
            IndicatorValue::Macd { .. } => IndicatorValue::Macd {
                line: 0.0,
                signal: 0.0,
                histogram: 0.0,
            },
            IndicatorValue::Bollinger { .. } => IndicatorValue::Bollinger {
                upper: 0.0,
                middle: 0.0,
                lower: 0.0,
            },
        }
    }
}

impl IndicatorPoint {
    /// A single-valued point; `None` becomes an undefined point.
    pub fn simple(date: NaiveDate, value: Option<f64>) -> Self {
        match value.and_then(finite) {
            Some(v) => Self {
                date,
                valid: true,
                value: IndicatorValue::Simple(v),
            },
            None => Self::undefined(date, IndicatorValue::Simple(0.0)),
        }
    }

    /// A multi-component point; undefined if any component is not finite.
    pub fn checked(date: NaiveDate, value: IndicatorValue) -> Self {
        if value.is_finite() {
            Self {
                date,
                valid: true,
                value,
            }
        } else {
            Self::undefined(date, value.zeroed())
        }
    }

    pub fn undefined(date: NaiveDate, placeholder: IndicatorValue) -> Self {
        Self {
            date,
            valid: false,
            value: placeholder,
        }
    }

    pub fn as_simple(&self) -> Option<f64> {
        match (self.valid, &self.value) {
            (true, IndicatorValue::Simple(v)) => Some(*v),
            _ => None,
        }
    }

    /// Component values in `IndicatorType::component_names` order, `None` when undefined.
    pub fn components(&self) -> Vec<Option<f64>> {
        let raw = match self.value {
            IndicatorValue::Simple(v) => vec![v],
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => vec![line, signal, histogram],
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => vec![upper, middle, lower],
        };
        raw.into_iter()
            .map(|v| if self.valid { Some(v) } else { None })
            .collect()
    }
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn simple_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(IndicatorPoint::as_simple).collect()
    }

    /// Defined single values, skipping undefined points.
    pub fn valid_simple_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(IndicatorPoint::as_simple).collect()
    }

    /// Number of undefined points before the first defined one.
    pub fn leading_undefined(&self) -> usize {
        self.values.iter().take_while(|p| !p.valid).count()
    }
}

impl IndicatorType {
    /// Column suffixes for multi-valued indicators; a single empty name otherwise.
    pub fn component_names(&self) -> &'static [&'static str] {
        match self {
            IndicatorType::Macd { .. } => &["line", "signal", "histogram"],
            IndicatorType::Bollinger { .. } => &["upper", "middle", "lower"],
            _ => &[""],
        }
    }

    /// Column headers used when exporting this indicator as a table.
    pub fn column_names(&self) -> Vec<String> {
        self.component_names()
            .iter()
            .map(|c| {
                if c.is_empty() {
                    self.to_string()
                } else {
                    format!("{}.{}", self, c)
                }
            })
            .collect()
    }

    pub fn bollinger(period: usize, mult: f64) -> Self {
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100: (mult * 100.0).round().max(0.0) as u32,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Returns => write!(f, "RETURNS"),
            IndicatorType::MonthlyReturns => write!(f, "MONTHLY_RETURNS"),
        }
    }
}
