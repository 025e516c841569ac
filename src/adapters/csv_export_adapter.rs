//! CSV export of the augmented price table.
//!
//! One row per bar: the six price columns, then one column per indicator
//! component. Undefined values are written as empty cells.

use crate::domain::analysis::Analysis;
use crate::domain::error::AnalyzerError;
use crate::domain::ohlcv::PricePoint;
use crate::ports::export_port::ExportPort;
use std::io::Write;
use std::path::Path;
use tracing::info;

const PRICE_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

#[derive(Debug, Default)]
pub struct CsvExportAdapter;

fn export_error(e: csv::Error) -> AnalyzerError {
    AnalyzerError::Data {
        reason: format!("CSV write error: {e}"),
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvExportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Writes the table to any writer; `write` wraps this around a file.
    pub fn write_to<W: Write>(
        &self,
        writer: W,
        bars: &[PricePoint],
        analysis: &Analysis,
    ) -> Result<(), AnalyzerError> {
        let mut wtr = csv::Writer::from_writer(writer);

        let header: Vec<String> = PRICE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(analysis.column_names())
            .collect();
        wtr.write_record(&header).map_err(export_error)?;

        for (i, bar) in bars.iter().enumerate() {
            let mut record = vec![
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ];
            record.extend(analysis.row(i).into_iter().map(cell));
            wtr.write_record(&record).map_err(export_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl ExportPort for CsvExportAdapter {
    fn write(
        &self,
        bars: &[PricePoint],
        analysis: &Analysis,
        output_path: &Path,
    ) -> Result<(), AnalyzerError> {
        let file = std::fs::File::create(output_path)?;
        self.write_to(file, bars, analysis)?;
        info!(path = %output_path.display(), rows = bars.len(), "wrote indicator table");
        Ok(())
    }
}
