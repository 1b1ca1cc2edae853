//! Performance metrics over a completed backtest.

use serde::Serialize;

use crate::domain::backtest::EquityPoint;
use crate::domain::position::Trade;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_return_pct: f64,
    pub win_rate: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub profit_factor: f64,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub closed_trades: usize,
}

impl Metrics {
    pub fn compute(
        initial_capital: f64,
        final_capital: f64,
        trades: &[Trade],
        equity: &[EquityPoint],
    ) -> Self {
        let total_return_pct = if initial_capital > 0.0 {
            (final_capital - initial_capital) / initial_capital * 100.0
        } else {
            0.0
        };

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut winning_pnl = 0.0_f64;
        let mut losing_pnl = 0.0_f64;

        for trade in trades {
            if trade.pnl > 0.0 {
                trades_won += 1;
                winning_pnl += trade.pnl;
            } else if trade.pnl < 0.0 {
                trades_lost += 1;
                losing_pnl += trade.pnl;
            }
        }

        let closed_trades = trades.len();
        let win_rate = if closed_trades > 0 {
            trades_won as f64 / closed_trades as f64
        } else {
            0.0
        };

        // no losing trades is defined as a neutral 1, not infinity; ambiguous
        // business semantics preserved as-is
        let profit_factor = if trades_lost > 0 {
            winning_pnl / losing_pnl.abs()
        } else {
            1.0
        };

        let max_drawdown_pct = equity
            .iter()
            .map(|p| p.drawdown_pct)
            .fold(0.0_f64, f64::max);

        let sharpe_ratio = compute_sharpe(equity);

        Metrics {
            total_return_pct,
            win_rate,
            max_drawdown_pct,
            sharpe_ratio,
            profit_factor,
            trades_won,
            trades_lost,
            closed_trades,
        }
    }
}

/// Annualized mean-over-stddev of per-bar equity returns; 0 on zero variance.
fn compute_sharpe(equity: &[EquityPoint]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = equity
        .windows(2)
        .map(|w| {
            if w[0].value > 0.0 {
                (w[1].value - w[0].value) / w[0].value
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}
