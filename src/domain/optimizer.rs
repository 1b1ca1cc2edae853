//! Strategy parameter optimizer.
//!
//! Single-iteration local search: generate a fixed neighborhood of one-knob
//! perturbations around the baseline, score each with a shortened backtest,
//! and accept the best neighbor only if it strictly beats the baseline's own
//! score. Rejection returns the baseline untouched.
//!
//! A variant that fails to evaluate (insufficient data, invalid perturbed
//! parameters) is skipped and logged — failure is never folded into the score
//! scale, so an unevaluable variant can neither outrank nor be outranked.
//!
//! Per-variant runs are independent pure computations; they are executed
//! sequentially here.

use chrono::NaiveDate;

use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::error::StratraderError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::strategy::StrategyDefinition;

/// Length of the shortened scoring backtest (most recent bars).
pub const QUICK_BACKTEST_BARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub strategy: StrategyDefinition,
    pub accepted: bool,
    pub baseline_score: f64,
    pub best_neighbor_score: Option<f64>,
}

/// Run one optimization pass over `baseline`.
///
/// `as_of` stamps an accepted variant's `updated` field; the caller supplies
/// it so the search itself stays clock-free and deterministic.
pub fn optimize(
    bars: &[PriceBar],
    baseline: &StrategyDefinition,
    config: &BacktestConfig,
    as_of: NaiveDate,
) -> Result<OptimizationOutcome, StratraderError> {
    let baseline_score = quick_backtest_score(bars, baseline, config)?;

    let mut best: Option<(StrategyDefinition, f64)> = None;
    for neighbor in neighborhood(baseline) {
        match quick_backtest_score(bars, &neighbor, config) {
            Ok(score) => {
                if best.as_ref().is_none_or(|(_, s)| score > *s) {
                    best = Some((neighbor, score));
                }
            }
            Err(e) => {
                eprintln!("warning: skipping variant of {}: {e}", baseline.id);
            }
        }
    }

    match best {
        Some((neighbor, score)) if score > baseline_score => {
            let accepted = StrategyDefinition {
                version: baseline.version + 1,
                updated: Some(as_of),
                ..neighbor
            };
            Ok(OptimizationOutcome {
                strategy: accepted,
                accepted: true,
                baseline_score,
                best_neighbor_score: Some(score),
            })
        }
        best => Ok(OptimizationOutcome {
            strategy: baseline.clone(),
            accepted: false,
            baseline_score,
            best_neighbor_score: best.map(|(_, s)| s),
        }),
    }
}

/// Score a definition by total return over the most recent
/// `QUICK_BACKTEST_BARS` bars.
pub fn quick_backtest_score(
    bars: &[PriceBar],
    def: &StrategyDefinition,
    config: &BacktestConfig,
) -> Result<f64, StratraderError> {
    let start = bars.len().saturating_sub(QUICK_BACKTEST_BARS);
    let result = run_backtest(&bars[start..], def, config)?;
    Ok(result.metrics.total_return_pct)
}

/// Fixed one-knob perturbations of the baseline. Neighbors that would fail
/// parameter validation are dropped rather than scored.
fn neighborhood(baseline: &StrategyDefinition) -> Vec<StrategyDefinition> {
    let mut neighbors = Vec::with_capacity(8);

    let mut push = |mutate: &dyn Fn(&mut StrategyDefinition)| {
        let mut candidate = baseline.clone();
        mutate(&mut candidate);
        if candidate != *baseline && candidate.validate().is_ok() {
            neighbors.push(candidate);
        }
    };

    push(&|d| d.conditions.rsi_lower = (d.conditions.rsi_lower - 5.0).max(0.0));
    push(&|d| d.conditions.rsi_lower += 5.0);
    push(&|d| d.conditions.rsi_upper -= 5.0);
    push(&|d| d.conditions.rsi_upper += 5.0);
    push(&|d| d.conditions.sma_short += 2);
    push(&|d| d.conditions.sma_long += 5);
    push(&|d| d.conditions.macd_threshold *= 1.1);
    push(&|d| d.conditions.volume_multiplier *= 1.2);

    neighbors
}
