//! OHLCV price bar representation.

use chrono::NaiveDate;

use crate::domain::error::StratraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Check the input contract for a bar series: strictly ascending dates,
/// no duplicates.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), StratraderError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(StratraderError::InvalidParameters {
                reason: format!(
                    "bars out of order: {} followed by {}",
                    pair[0].date, pair[1].date
                ),
            });
        }
    }
    Ok(())
}
