//! MACD (Moving Average Convergence Divergence).
//!
//! macd[i] = EMA_fast[i + offset] - EMA_slow[i] with offset = slow - fast,
//! so the MACD line is aligned to the slow EMA (length = len - slow + 1).
//! signal = EMA(macd, signal_period); histogram[i] = macd[i + signal_period - 1]
//! - signal[i], aligned to the signal line.

use crate::domain::indicator::ema::ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(prices: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    if fast == 0 || signal_period == 0 || fast >= slow || prices.len() < slow {
        return MacdSeries::default();
    }

    let ema_fast = ema(prices, fast);
    let ema_slow = ema(prices, slow);
    let offset = slow - fast;

    let mut macd_line = Vec::with_capacity(ema_slow.len());
    for (i, &slow_val) in ema_slow.iter().enumerate() {
        macd_line.push(ema_fast[i + offset] - slow_val);
    }

    // empty when the MACD line itself is shorter than the signal period
    let signal_line = ema(&macd_line, signal_period);

    let mut histogram = Vec::with_capacity(signal_line.len());
    for (i, &signal_val) in signal_line.iter().enumerate() {
        histogram.push(macd_line[i + signal_period - 1] - signal_val);
    }

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}
