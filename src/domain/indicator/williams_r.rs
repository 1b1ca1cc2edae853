//! Williams %R.
//!
//! %R = (highest_high - close) / (highest_high - lowest_low) · -100 over the
//! window, bounded in [-100, 0]. A zero-range window yields 0.
//! Output length = len - period + 1.

use crate::domain::ohlcv::PriceBar;

pub fn williams_r(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(bars.len() - period + 1);
    for i in (period - 1)..bars.len() {
        let start = i + 1 - period;
        let window = &bars[start..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;

        let value = if range == 0.0 {
            0.0
        } else {
            (highest - bars[i].close) / range * -100.0
        };
        out.push(value);
    }

    out
}
