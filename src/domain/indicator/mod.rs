//! Technical indicator library.
//!
//! Pure functions over price slices. Every function returns a suffix-aligned
//! series: the output omits the warm-up period, so `output[0]` corresponds to
//! the first input index at which the indicator is defined. Callers recover
//! an indicator's offset as `input_len - output.len()` and must apply it per
//! series when aligning indicators of different periods against the same bar
//! index.
//!
//! Insufficient input (or a zero period) yields an empty series, never an
//! error; the length check belongs to the caller.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod williams_r;

pub use adx::adx;
pub use atr::atr;
pub use bollinger::{bollinger, BollingerSeries};
pub use cci::cci;
pub use ema::ema;
pub use macd::{macd, MacdSeries, DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
pub use obv::obv;
pub use rsi::{rsi, DEFAULT_RSI_PERIOD};
pub use sma::sma;
pub use stochastic::{stochastic, StochasticSeries};
pub use williams_r::williams_r;

/// Warm-up offset of a suffix-aligned series against its input.
pub fn offset(input_len: usize, series_len: usize) -> usize {
    input_len - series_len
}

/// Look up the value of a suffix-aligned series at an input bar index.
/// `None` inside the warm-up period or past the end of the input.
pub fn at(series: &[f64], input_len: usize, bar_index: usize) -> Option<f64> {
    let off = input_len - series.len();
    if bar_index < off {
        return None;
    }
    series.get(bar_index - off).copied()
}
