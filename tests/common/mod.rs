#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;

use stratrader::domain::error::StratraderError;
pub use stratrader::domain::ohlcv::PriceBar;
use stratrader::domain::strategy::{StrategyDefinition, StrategyType};
use stratrader::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, StratraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StratraderError::DataAccess {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratraderError> {
        Ok(self.data.keys().cloned().collect())
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StratraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StratraderError::DataAccess {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day_offset: i64, close: f64, volume: i64) -> PriceBar {
    PriceBar {
        date: date(2024, 1, 1) + chrono::Duration::days(day_offset),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume,
    }
}

pub fn bars_from_closes(closes: &[f64], volume: i64) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as i64, close, volume))
        .collect()
}

pub fn linear_closes(n: usize, start: f64, end: f64) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Momentum definition with the RSI and volume gates opened wide and
/// protective exits disabled, so the SMA/MACD trend drives the whole
/// position lifecycle.
pub fn trend_strategy() -> StrategyDefinition {
    let mut def = StrategyDefinition::preset("trend", StrategyType::Momentum);
    def.conditions.rsi_lower = 0.0;
    def.conditions.rsi_upper = 101.0;
    def.conditions.volume_multiplier = 0.5;
    def.risk.stop_loss_pct = 0.0;
    def.risk.take_profit_pct = 0.0;
    def.risk.max_position_size = 1.0;
    def
}
