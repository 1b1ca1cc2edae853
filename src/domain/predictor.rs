//! Prediction capability.
//!
//! `Predictor` is the seam between heuristic scoring and any model-backed
//! collaborator: both produce the same `Signal` shape, and the ensemble
//! combines whichever variants are present with fixed weights. Nothing here
//! requires a model variant to exist.

use crate::domain::error::StratraderError;
use crate::domain::indicator::{macd, rsi, sma, DEFAULT_FAST, DEFAULT_RSI_PERIOD, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::ohlcv::PriceBar;
use crate::domain::scanner::MIN_SCAN_BARS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalLabel {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub label: SignalLabel,
    pub confidence: f64,
}

pub trait Predictor {
    fn predict(&self, bars: &[PriceBar]) -> Result<Signal, StratraderError>;
}

/// Indicator-vote heuristic: SMA trend, RSI extremes, and MACD sign each
/// cast one vote; the net vote sets the label and scales the confidence.
#[derive(Debug, Default)]
pub struct HeuristicPredictor;

impl Predictor for HeuristicPredictor {
    fn predict(&self, bars: &[PriceBar]) -> Result<Signal, StratraderError> {
        if bars.len() < MIN_SCAN_BARS {
            return Err(StratraderError::InsufficientData {
                have: bars.len(),
                need: MIN_SCAN_BARS,
            });
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let rsi_last = rsi(&closes, DEFAULT_RSI_PERIOD)
            .last()
            .copied()
            .ok_or_else(|| StratraderError::Computation {
                reason: "rsi series empty after length check".into(),
            })?;
        let sma_short = sma(&closes, 10);
        let sma_long = sma(&closes, 30);
        let macd_last = macd(&closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
            .macd
            .last()
            .copied()
            .ok_or_else(|| StratraderError::Computation {
                reason: "macd series empty after length check".into(),
            })?;

        let mut votes = 0i32;
        match (sma_short.last(), sma_long.last()) {
            (Some(s), Some(l)) if s > l => votes += 1,
            (Some(s), Some(l)) if s < l => votes -= 1,
            _ => {}
        }
        if rsi_last < 30.0 {
            votes += 1; // oversold, bounce expected
        } else if rsi_last > 70.0 {
            votes -= 1;
        }
        if macd_last > 0.0 {
            votes += 1;
        } else if macd_last < 0.0 {
            votes -= 1;
        }

        let label = match votes {
            v if v > 0 => SignalLabel::Bullish,
            v if v < 0 => SignalLabel::Bearish,
            _ => SignalLabel::Neutral,
        };
        let confidence = (50.0 + votes.unsigned_abs() as f64 * 15.0).min(95.0);

        Ok(Signal { label, confidence })
    }
}

/// Fixed-weight combination over member predictors. Members that fail are
/// skipped; the ensemble only errors when every member does.
pub struct EnsemblePredictor {
    members: Vec<(Box<dyn Predictor>, f64)>,
}

impl EnsemblePredictor {
    pub fn new(members: Vec<(Box<dyn Predictor>, f64)>) -> Self {
        EnsemblePredictor { members }
    }
}

impl Predictor for EnsemblePredictor {
    fn predict(&self, bars: &[PriceBar]) -> Result<Signal, StratraderError> {
        let mut bullish = 0.0_f64;
        let mut bearish = 0.0_f64;
        let mut neutral = 0.0_f64;
        let mut total_weight = 0.0_f64;

        for (member, weight) in &self.members {
            let signal = match member.predict(bars) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("warning: ensemble member failed ({e})");
                    continue;
                }
            };
            let mass = weight * signal.confidence;
            match signal.label {
                SignalLabel::Bullish => bullish += mass,
                SignalLabel::Bearish => bearish += mass,
                SignalLabel::Neutral => neutral += mass,
            }
            total_weight += weight;
        }

        if total_weight == 0.0 {
            return Err(StratraderError::Computation {
                reason: "no ensemble member produced a signal".into(),
            });
        }

        let mut winner = (SignalLabel::Bullish, bullish);
        if bearish > winner.1 {
            winner = (SignalLabel::Bearish, bearish);
        }
        if neutral > winner.1 {
            winner = (SignalLabel::Neutral, neutral);
        }

        Ok(Signal {
            label: winner.0,
            confidence: (winner.1 / total_weight).min(95.0),
        })
    }
}
