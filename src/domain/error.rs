//! Error types for the data, config and CLI layers.
//!
//! The indicator engine itself never fails: insufficient history and
//! degenerate denominators surface as undefined points, not errors.

use chrono::NaiveDate;

/// Top-level error type for stockscope.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid price series at {date}: {reason}")]
    InvalidSeries { date: NaiveDate, reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AnalyzerError> for std::process::ExitCode {
    fn from(err: &AnalyzerError) -> Self {
        let code: u8 = match err {
            AnalyzerError::Io(_) => 1,
            AnalyzerError::ConfigParse { .. }
            | AnalyzerError::ConfigMissing { .. }
            | AnalyzerError::ConfigInvalid { .. } => 2,
            AnalyzerError::Data { .. } => 3,
            AnalyzerError::InvalidSeries { .. } | AnalyzerError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
