//! Position and trade records.
//!
//! A `Position` exists only inside the simulator's walk-forward loop; closing
//! one produces a `Trade`. The simulator holds at most one open position at a
//! time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub quantity: i64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.entry_price)
    }

    /// Percent move from the entry price, the quantity cancels out.
    pub fn unrealized_pnl_pct(&self, price: f64) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (price - self.entry_price) / self.entry_price * 100.0
    }
}

/// Why a position was closed. Stop-loss outranks take-profit, which outranks
/// a signal exit; end-of-data is the unconditional terminal close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    Signal,
    EndOfData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub quantity: i64,
    pub pnl: f64,
    pub pnl_pct: f64,
    pub reason: ExitReason,
}

impl Trade {
    pub fn close(position: Position, exit_date: NaiveDate, exit_price: f64, reason: ExitReason) -> Self {
        let pnl = position.unrealized_pnl(exit_price);
        let pnl_pct = position.unrealized_pnl_pct(exit_price);
        Trade {
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_date,
            exit_price,
            quantity: position.quantity,
            pnl,
            pnl_pct,
            reason,
        }
    }
}
