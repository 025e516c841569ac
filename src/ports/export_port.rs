//! Export port trait for the augmented price table.

use crate::domain::analysis::Analysis;
use crate::domain::error::AnalyzerError;
use crate::domain::ohlcv::PricePoint;
use std::path::Path;

/// Writes bars alongside their computed indicator columns.
pub trait ExportPort {
    fn write(
        &self,
        bars: &[PricePoint],
        analysis: &Analysis,
        output_path: &Path,
    ) -> Result<(), AnalyzerError>;
}
