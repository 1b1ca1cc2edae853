//! OBV (On-Balance Volume).
//!
//! obv[0] = volume[0]; then volume is added on an up close, subtracted on a
//! down close, carried on an unchanged close. No warm-up; output length = len.

use crate::domain::ohlcv::PriceBar;

pub fn obv(bars: &[PriceBar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut running = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            running = bar.volume as f64;
        } else if bar.close > bars[i - 1].close {
            running += bar.volume as f64;
        } else if bar.close < bars[i - 1].close {
            running -= bar.volume as f64;
        }
        out.push(running);
    }

    out
}
