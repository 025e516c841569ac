//! Core domain types and the indicator engine.

pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod ohlcv;
pub mod returns;
