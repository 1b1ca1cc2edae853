//! RSI (Relative Strength Index).
//!
//! Rolling mean of gains and losses over the last `period` price changes:
//! RS = avg_gain / avg_loss, RSI = 100 - 100/(1+RS).
//! If avg_loss == 0: RSI = 100.
//!
//! A window of `period` changes needs `period + 1` prices, so the output
//! length is len(prices) - period.

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub fn rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() <= period {
        return Vec::new();
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let mut out = Vec::with_capacity(changes.len() - period + 1);

    for window in changes.windows(period) {
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for &change in window {
            if change > 0.0 {
                gain_sum += change;
            } else {
                loss_sum -= change;
            }
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        let value = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
        out.push(value);
    }

    out
}
