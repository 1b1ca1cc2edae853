//! Entry/exit predicate evaluation.
//!
//! An `IndicatorView` precomputes the indicator series a strategy needs and
//! answers per-bar lookups with each series' warm-up offset applied. Every
//! series is suffix-aligned to the bar slice, so a lookup inside any series'
//! warm-up window returns `None` and the predicates treat the bar as
//! non-signaling. Misaligned offsets are the classic correctness bug in this
//! domain; all alignment lives here.
//!
//! Entry predicates use AND semantics over the strategy's thresholds. Exit
//! predicates are the per-type signal exits checked after stop-loss and
//! take-profit.

use crate::domain::indicator::{self, macd, rsi, sma, DEFAULT_RSI_PERIOD};
use crate::domain::ohlcv::PriceBar;
use crate::domain::strategy::{StrategyDefinition, StrategyType};

/// Window for the average-volume baseline used by volume-confirmation gates.
pub const AVG_VOLUME_PERIOD: usize = 20;

/// Half-width of the RSI band around 50 used by the scalping predicates.
const SCALPING_RSI_BAND: f64 = 15.0;

/// Indicator values of one bar, with every warm-up offset already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarIndicators {
    pub rsi: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub macd: f64,
    pub avg_volume: f64,
}

#[derive(Debug, Clone)]
pub struct IndicatorView {
    bar_count: usize,
    rsi: Vec<f64>,
    sma_short: Vec<f64>,
    sma_long: Vec<f64>,
    macd: Vec<f64>,
    avg_volume: Vec<f64>,
}

impl IndicatorView {
    pub fn new(bars: &[PriceBar], def: &StrategyDefinition) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

        IndicatorView {
            bar_count: bars.len(),
            rsi: rsi(&closes, DEFAULT_RSI_PERIOD),
            sma_short: sma(&closes, def.conditions.sma_short),
            sma_long: sma(&closes, def.conditions.sma_long),
            macd: macd(
                &closes,
                indicator::DEFAULT_FAST,
                indicator::DEFAULT_SLOW,
                indicator::DEFAULT_SIGNAL,
            )
            .macd,
            avg_volume: sma(&volumes, AVG_VOLUME_PERIOD),
        }
    }

    /// First bar index at which every precomputed series is defined, or
    /// `None` when any series is empty.
    pub fn first_evaluable_bar(&self) -> Option<usize> {
        let series = [
            &self.rsi,
            &self.sma_short,
            &self.sma_long,
            &self.macd,
            &self.avg_volume,
        ];
        if series.iter().any(|s| s.is_empty()) {
            return None;
        }
        series
            .iter()
            .map(|s| indicator::offset(self.bar_count, s.len()))
            .max()
    }

    /// All indicator values at `bar_index`; `None` while any series is still
    /// warming up.
    pub fn at(&self, bar_index: usize) -> Option<BarIndicators> {
        Some(BarIndicators {
            rsi: indicator::at(&self.rsi, self.bar_count, bar_index)?,
            sma_short: indicator::at(&self.sma_short, self.bar_count, bar_index)?,
            sma_long: indicator::at(&self.sma_long, self.bar_count, bar_index)?,
            macd: indicator::at(&self.macd, self.bar_count, bar_index)?,
            avg_volume: indicator::at(&self.avg_volume, self.bar_count, bar_index)?,
        })
    }
}

/// Evaluate the entry predicate for `def` at `bar_index`. False inside any
/// series' warm-up window.
pub fn entry_signal(
    def: &StrategyDefinition,
    view: &IndicatorView,
    bars: &[PriceBar],
    bar_index: usize,
) -> bool {
    let Some(ind) = view.at(bar_index) else {
        return false;
    };
    let c = &def.conditions;
    let volume = bars[bar_index].volume as f64;

    match def.strategy_type {
        StrategyType::Momentum => {
            ind.rsi > c.rsi_lower
                && ind.rsi < c.rsi_upper
                && ind.sma_short > ind.sma_long
                && ind.macd > c.macd_threshold
                && volume > ind.avg_volume * c.volume_multiplier
        }
        StrategyType::Reversal => {
            (ind.rsi < c.rsi_lower || ind.rsi > c.rsi_upper) && ind.macd < c.macd_threshold
        }
        StrategyType::Breakout => {
            ind.sma_short > ind.sma_long
                && ind.rsi > c.rsi_lower
                && volume > ind.avg_volume * c.volume_multiplier
        }
        StrategyType::Swing => {
            ind.rsi > c.rsi_lower && ind.rsi < c.rsi_upper && ind.sma_short > ind.sma_long
        }
        StrategyType::Scalping => {
            (ind.rsi - 50.0).abs() < SCALPING_RSI_BAND && ind.sma_short > ind.sma_long
        }
    }
}

/// Evaluate the per-type signal exit for `def` at `bar_index`.
pub fn exit_signal(
    def: &StrategyDefinition,
    view: &IndicatorView,
    bar_index: usize,
) -> bool {
    let Some(ind) = view.at(bar_index) else {
        return false;
    };
    let c = &def.conditions;

    match def.strategy_type {
        StrategyType::Momentum | StrategyType::Swing => {
            ind.rsi > c.rsi_upper || ind.sma_short < ind.sma_long
        }
        StrategyType::Reversal => ind.rsi > c.rsi_lower && ind.rsi < c.rsi_upper,
        StrategyType::Breakout => ind.sma_short < ind.sma_long,
        StrategyType::Scalping => (ind.rsi - 50.0).abs() >= SCALPING_RSI_BAND,
    }
}
