//! ADX (Average Directional Index), simplified form.
//!
//! Trend strength approximated as the ATR expressed as a percentage of the
//! aligned close, clamped to [0,100]. This keeps the conventional [0,100]
//! scale without the full +DI/-DI machinery.
//! Output length = len - period + 1 (same alignment as ATR).

use crate::domain::indicator::atr::atr;
use crate::domain::ohlcv::PriceBar;

pub fn adx(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let atr_series = atr(bars, period);
    if atr_series.is_empty() {
        return Vec::new();
    }

    let offset = bars.len() - atr_series.len();
    atr_series
        .iter()
        .enumerate()
        .map(|(i, &range)| {
            let close = bars[i + offset].close;
            if close == 0.0 {
                0.0
            } else {
                (range / close * 100.0).clamp(0.0, 100.0)
            }
        })
        .collect()
}
