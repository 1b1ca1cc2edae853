//! Exponential Moving Average.
//!
//! α = 2/(period+1), seeded with the SMA of the first `period` prices, then
//! ema[i] = price[i]·α + ema[i-1]·(1-α). Output length = len - period + 1.

/// Exponentially weighted mean, SMA-seeded.
pub fn ema(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(prices.len() - period + 1);
    let alpha = 2.0 / (period as f64 + 1.0);

    let mut current = prices[..period].iter().sum::<f64>() / period as f64;
    out.push(current);

    for &price in &prices[period..] {
        current = price * alpha + current * (1.0 - alpha);
        out.push(current);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_seed_is_sma() {
        let prices = [10.0, 20.0, 30.0, 40.0];
        let series = ema(&prices, 3);
        assert_eq!(series.len(), 2);
        assert_relative_eq!(series[0], 20.0);
    }

    #[test]
    fn ema_smoothing_step() {
        let prices = [10.0, 20.0, 30.0, 40.0];
        let series = ema(&prices, 3);
        // α = 0.5: 40·0.5 + 20·0.5 = 30
        assert_relative_eq!(series[1], 30.0);
    }

    #[test]
    fn ema_constant_prices() {
        let prices = [50.0; 10];
        let series = ema(&prices, 4);
        assert_eq!(series.len(), 7);
        for v in series {
            assert_relative_eq!(v, 50.0);
        }
    }

    #[test]
    fn ema_length_formula() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert_eq!(ema(&prices, 12).len(), 30 - 12 + 1);
    }

    #[test]
    fn ema_insufficient_input() {
        assert!(ema(&[1.0, 2.0], 3).is_empty());
        assert!(ema(&[], 3).is_empty());
    }

    #[test]
    fn ema_zero_period() {
        assert!(ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_tracks_rising_prices() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64 * 2.0).collect();
        let series = ema(&prices, 5);
        for pair in series.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }
}
