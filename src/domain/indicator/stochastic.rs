//! Stochastic oscillator.
//!
//! %K = (close - lowest_low) / (highest_high - lowest_low) · 100 over the
//! window; %D = SMA(%K, 3). A zero-range window yields 0 rather than a
//! division by zero.
//!
//! %K length = len - period + 1; %D length = %K length - 2.

use crate::domain::indicator::sma::sma;

const D_PERIOD: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

pub fn stochastic(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> StochasticSeries {
    let n = closes.len();
    if period == 0 || n < period || highs.len() != n || lows.len() != n {
        return StochasticSeries::default();
    }

    let mut k = Vec::with_capacity(n - period + 1);
    for i in (period - 1)..n {
        let start = i + 1 - period;
        let highest = highs[start..=i].iter().cloned().fold(f64::MIN, f64::max);
        let lowest = lows[start..=i].iter().cloned().fold(f64::MAX, f64::min);
        let range = highest - lowest;

        let value = if range == 0.0 {
            0.0
        } else {
            (closes[i] - lowest) / range * 100.0
        };
        k.push(value);
    }

    let d = sma(&k, D_PERIOD);
    StochasticSeries { k, d }
}
