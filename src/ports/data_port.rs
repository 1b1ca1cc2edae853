//! Data access port trait.
//!
//! Historical OHLCV retrieval is an external collaborator; the domain only
//! sees this seam. Implementations must return bars in ascending date order.

use crate::domain::error::StratraderError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, StratraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, StratraderError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StratraderError>;
}
