//! CCI (Commodity Channel Index).
//!
//! cci = (tp - SMA(tp)) / (0.015 · mean deviation) over typical prices.
//! A zero mean deviation yields 0 rather than a division by zero.
//! Output length = len - period + 1.

use crate::domain::ohlcv::PriceBar;

const CCI_SCALE: f64 = 0.015;

pub fn cci(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    let typical: Vec<f64> = bars.iter().map(|b| b.typical_price()).collect();
    let mut out = Vec::with_capacity(bars.len() - period + 1);

    for window in typical.windows(period) {
        let mean = window.iter().sum::<f64>() / period as f64;
        let mean_dev = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;

        let current = window[period - 1];
        let value = if mean_dev == 0.0 {
            0.0
        } else {
            (current - mean) / (CCI_SCALE * mean_dev)
        };
        out.push(value);
    }

    out
}
