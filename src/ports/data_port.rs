//! Price data access port trait.

use crate::domain::error::AnalyzerError;
use crate::domain::ohlcv::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol`, sorted by date. Open bounds are inclusive;
    /// `None` leaves that side unbounded.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, AnalyzerError>;

    fn list_symbols(&self) -> Result<Vec<String>, AnalyzerError>;

    /// First date, last date and bar count, or `None` when there is no data.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, AnalyzerError>;
}
