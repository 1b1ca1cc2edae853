//! Walk-forward backtest simulator.
//!
//! Replays a bar series strictly in date order against a strategy
//! definition, running a two-state (flat/long) position machine. Decisions at
//! bar `i` use only information available at bar `i` — indicator series are
//! suffix-aligned, so a lookup can never reach forward.
//!
//! Exit checks run in capital-preservation order: stop-loss, then
//! take-profit, then the strategy's signal exit. A position still open after
//! the last bar is force-closed at the final close.
//!
//! Determinism: identical `(bars, definition, config)` inputs produce an
//! identical `BacktestResult`; the loop reads no clock and draws no
//! randomness.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::StratraderError;
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::{validate_series, PriceBar};
use crate::domain::position::{ExitReason, Position, Trade};
use crate::domain::rule_eval::{entry_signal, exit_signal, IndicatorView};
use crate::domain::strategy::StrategyDefinition;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub drawdown_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
    pub metrics: Metrics,
    pub final_capital: f64,
}

pub fn run_backtest(
    bars: &[PriceBar],
    def: &StrategyDefinition,
    config: &BacktestConfig,
) -> Result<BacktestResult, StratraderError> {
    def.validate()?;
    validate_series(bars)?;

    if config.initial_capital <= 0.0 {
        return Err(StratraderError::InvalidParameters {
            reason: format!("initial_capital must be positive, got {}", config.initial_capital),
        });
    }

    let need = def.required_bars();
    if bars.len() < need {
        return Err(StratraderError::InsufficientData {
            have: bars.len(),
            need,
        });
    }

    let view = IndicatorView::new(bars, def);

    let mut capital = config.initial_capital;
    let mut open: Option<Position> = None;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity = Vec::with_capacity(bars.len());
    let mut peak = 0.0_f64;

    for (i, bar) in bars.iter().enumerate() {
        let price = bar.close;

        if let Some(position) = open.take() {
            let pnl_pct = position.unrealized_pnl_pct(price);
            let risk = &def.risk;

            // stop-loss first: the capital-preservation tie-break
            let reason = if risk.stop_loss_pct > 0.0 && pnl_pct <= -risk.stop_loss_pct {
                Some(ExitReason::StopLoss)
            } else if risk.take_profit_pct > 0.0 && pnl_pct >= risk.take_profit_pct {
                Some(ExitReason::TakeProfit)
            } else if exit_signal(def, &view, i) {
                Some(ExitReason::Signal)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    capital += position.market_value(price);
                    trades.push(Trade::close(position, bar.date, price, reason));
                }
                None => open = Some(position),
            }
        } else if entry_signal(def, &view, bars, i) {
            let quantity = (capital * def.risk.max_position_size / price).floor() as i64;
            if quantity > 0 {
                capital -= quantity as f64 * price;
                open = Some(Position {
                    entry_date: bar.date,
                    entry_price: price,
                    quantity,
                });
            }
        }

        // one equity point per bar regardless of position state; an open
        // position is marked at quantity * price, residual cash is not
        let portfolio_value = match open.as_ref() {
            Some(position) => position.market_value(price),
            None => capital,
        };
        peak = peak.max(portfolio_value);
        let drawdown_pct = if peak > 0.0 {
            (peak - portfolio_value) / peak * 100.0
        } else {
            0.0
        };
        equity.push(EquityPoint {
            date: bar.date,
            value: portfolio_value,
            drawdown_pct,
        });
    }

    // unconditional terminal close at the last available price; the length
    // check above guarantees at least one bar exists
    if let Some(position) = open.take() {
        let last = &bars[bars.len() - 1];
        capital += position.market_value(last.close);
        trades.push(Trade::close(
            position,
            last.date,
            last.close,
            ExitReason::EndOfData,
        ));
    }

    let metrics = Metrics::compute(config.initial_capital, capital, &trades, &equity);

    Ok(BacktestResult {
        trades,
        equity,
        metrics,
        final_capital: capital,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::StrategyType;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64], volume: i64) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume,
            })
            .collect()
    }

    /// Momentum strategy with gates opened so the SMA cross drives entries
    /// and protective exits are disabled.
    fn hold_the_trend() -> StrategyDefinition {
        let mut def = StrategyDefinition::preset("test", StrategyType::Momentum);
        def.conditions.rsi_lower = 0.0;
        def.conditions.rsi_upper = 101.0;
        def.conditions.volume_multiplier = 0.5;
        def.risk.stop_loss_pct = 0.0;
        def.risk.take_profit_pct = 0.0;
        def.risk.max_position_size = 1.0;
        def
    }

    fn linear_series(n: usize, start: f64, end: f64) -> Vec<f64> {
        let step = (end - start) / (n - 1) as f64;
        (0..n).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn refuses_short_series() {
        let bars = make_bars(&linear_series(20, 100.0, 110.0), 1000);
        let def = hold_the_trend();
        let result = run_backtest(&bars, &def, &BacktestConfig::default());
        assert!(matches!(
            result,
            Err(StratraderError::InsufficientData { have: 20, need: 30 })
        ));
    }

    #[test]
    fn refuses_invalid_strategy() {
        let bars = make_bars(&linear_series(100, 100.0, 150.0), 1000);
        let mut def = hold_the_trend();
        def.risk.max_position_size = 0.0;
        assert!(matches!(
            run_backtest(&bars, &def, &BacktestConfig::default()),
            Err(StratraderError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn refuses_non_positive_capital() {
        let bars = make_bars(&linear_series(100, 100.0, 150.0), 1000);
        let def = hold_the_trend();
        let config = BacktestConfig {
            initial_capital: 0.0,
        };
        assert!(run_backtest(&bars, &def, &config).is_err());
    }

    #[test]
    fn refuses_unordered_series() {
        let mut bars = make_bars(&linear_series(40, 100.0, 120.0), 1000);
        bars.swap(5, 6);
        let def = hold_the_trend();
        assert!(run_backtest(&bars, &def, &BacktestConfig::default()).is_err());
    }

    #[test]
    fn rising_series_single_profitable_trade() {
        let bars = make_bars(&linear_series(100, 100.0, 150.0), 10_000);
        let def = hold_the_trend();
        let result = run_backtest(&bars, &def, &BacktestConfig::default()).unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert!(trade.pnl > 0.0);
        assert_eq!(trade.reason, ExitReason::EndOfData);
        assert_eq!(trade.exit_date, bars.last().unwrap().date);
    }

    #[test]
    fn one_equity_point_per_bar() {
        let bars = make_bars(&linear_series(100, 100.0, 150.0), 10_000);
        let def = hold_the_trend();
        let result = run_backtest(&bars, &def, &BacktestConfig::default()).unwrap();
        assert_eq!(result.equity.len(), bars.len());
        for pair in result.equity.windows(2) {
            assert!(pair[1].date > pair[0].date);
        }
    }

    #[test]
    fn stop_loss_closes_before_signal() {
        // rise long enough to enter, then crash past the stop
        let mut closes = linear_series(60, 100.0, 130.0);
        closes.extend(linear_series(10, 80.0, 60.0));
        let bars = make_bars(&closes, 10_000);

        let mut def = hold_the_trend();
        def.risk.stop_loss_pct = 5.0;
        let result = run_backtest(&bars, &def, &BacktestConfig::default()).unwrap();

        assert!(!result.trades.is_empty());
        assert_eq!(result.trades[0].reason, ExitReason::StopLoss);
        assert!(result.trades[0].pnl < 0.0);
    }

    #[test]
    fn take_profit_closes_winner() {
        let bars = make_bars(&linear_series(100, 100.0, 200.0), 10_000);
        let mut def = hold_the_trend();
        def.risk.take_profit_pct = 10.0;
        let result = run_backtest(&bars, &def, &BacktestConfig::default()).unwrap();

        assert!(!result.trades.is_empty());
        assert_eq!(result.trades[0].reason, ExitReason::TakeProfit);
        assert!(result.trades[0].pnl_pct >= 10.0);
    }

    #[test]
    fn equity_value_never_negative() {
        let mut closes = linear_series(60, 100.0, 130.0);
        closes.extend(linear_series(40, 130.0, 20.0));
        let bars = make_bars(&closes, 10_000);
        let def = hold_the_trend();
        let result = run_backtest(&bars, &def, &BacktestConfig::default()).unwrap();
        for point in &result.equity {
            assert!(point.value >= 0.0);
            assert!((0.0..=100.0).contains(&point.drawdown_pct));
        }
    }

    #[test]
    fn open_position_equity_is_position_value_only() {
        // while a position is open the equity point marks quantity * price;
        // residual cash is not included
        let bars = make_bars(&linear_series(100, 100.0, 150.0), 10_000);
        let def = hold_the_trend();
        let config = BacktestConfig::default();
        let result = run_backtest(&bars, &def, &config).unwrap();

        let trade = &result.trades[0];
        let entry_point = result
            .equity
            .iter()
            .find(|p| p.date == trade.entry_date)
            .unwrap();
        let expected = trade.quantity as f64 * trade.entry_price;
        assert!((entry_point.value - expected).abs() < 1e-9);
        assert!(entry_point.value < config.initial_capital);
    }

    #[test]
    fn deterministic_runs() {
        let bars = make_bars(&linear_series(120, 100.0, 90.0), 10_000);
        let def = StrategyDefinition::preset("test", StrategyType::Reversal);
        let config = BacktestConfig::default();
        let a = run_backtest(&bars, &def, &config).unwrap();
        let b = run_backtest(&bars, &def, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn final_capital_matches_trades() {
        let bars = make_bars(&linear_series(100, 100.0, 150.0), 10_000);
        let def = hold_the_trend();
        let config = BacktestConfig::default();
        let result = run_backtest(&bars, &def, &config).unwrap();
        let pnl_sum: f64 = result.trades.iter().map(|t| t.pnl).sum();
        assert!((result.final_capital - (config.initial_capital + pnl_sum)).abs() < 1e-6);
    }

    #[test]
    fn flat_market_no_trades() {
        let bars = make_bars(&vec![100.0; 80], 10_000);
        // flat series: sma_short == sma_long, never strictly greater
        let def = hold_the_trend();
        let result = run_backtest(&bars, &def, &BacktestConfig::default()).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.final_capital, 100_000.0);
    }
}
