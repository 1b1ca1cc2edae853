//! ATR (Average True Range).
//!
//! Wilder smoothing over true ranges: seed with the mean of the first
//! `period` TRs, then atr = (prev·(period-1) + tr) / period. The first bar's
//! true range is high - low (no previous close).
//! Output length = len - period + 1.

use crate::domain::ohlcv::PriceBar;

pub fn atr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    let mut tr_values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        };
        tr_values.push(tr);
    }

    let mut out = Vec::with_capacity(bars.len() - period + 1);
    let mut current = tr_values[..period].iter().sum::<f64>() / period as f64;
    out.push(current);

    for &tr in &tr_values[period..] {
        current = (current * (period - 1) as f64 + tr) / period as f64;
        out.push(current);
    }

    out
}
