//! Bollinger Bands.
//!
//! Middle = SMA(period); upper/lower = middle ± k·σ where σ is the
//! population standard deviation of each window (divides by N, not N-1).
//! Output length = len - period + 1 for all three bands.

use crate::domain::indicator::sma::sma;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger(prices: &[f64], period: usize, k: f64) -> BollingerSeries {
    if period == 0 || prices.len() < period {
        return BollingerSeries::default();
    }

    let middle = sma(prices, period);
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for (i, window) in prices.windows(period).enumerate() {
        let mean = middle[i];
        let variance = window
            .iter()
            .map(|p| {
                let diff = p - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        upper.push(mean + k * stddev);
        lower.push(mean - k * stddev);
    }

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bollinger_lengths() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i % 4) as f64).collect();
        let series = bollinger(&prices, 20, 2.0);
        assert_eq!(series.middle.len(), 40 - 20 + 1);
        assert_eq!(series.upper.len(), series.middle.len());
        assert_eq!(series.lower.len(), series.middle.len());
    }

    #[test]
    fn bollinger_constant_prices_collapse() {
        let prices = [100.0; 25];
        let series = bollinger(&prices, 20, 2.0);
        for i in 0..series.middle.len() {
            assert_relative_eq!(series.middle[i], 100.0);
            assert_relative_eq!(series.upper[i], 100.0);
            assert_relative_eq!(series.lower[i], 100.0);
        }
    }

    #[test]
    fn bollinger_population_stddev() {
        // window [2,4,4,4,5,5,7,9]: mean 5, population σ = 2
        let prices = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let series = bollinger(&prices, 8, 2.0);
        assert_eq!(series.middle.len(), 1);
        assert_relative_eq!(series.middle[0], 5.0);
        assert_relative_eq!(series.upper[0], 9.0);
        assert_relative_eq!(series.lower[0], 1.0);
    }

    #[test]
    fn bollinger_bands_bracket_middle() {
        let prices: Vec<f64> = (0..50)
            .map(|i| 100.0 + ((i * 11) % 17) as f64)
            .collect();
        let series = bollinger(&prices, 20, 2.0);
        for i in 0..series.middle.len() {
            assert!(series.upper[i] >= series.middle[i]);
            assert!(series.lower[i] <= series.middle[i]);
        }
    }

    #[test]
    fn bollinger_insufficient_input() {
        let prices = [1.0, 2.0, 3.0];
        let series = bollinger(&prices, 20, 2.0);
        assert!(series.middle.is_empty());
        assert!(series.upper.is_empty());
        assert!(series.lower.is_empty());
    }
}
