//! Strategy definitions.
//!
//! A `StrategyDefinition` is the interchange record between the optimizer,
//! the simulator, and any persistence collaborator. It is immutable once
//! handed to a backtest run; the optimizer emits a new value with a bumped
//! version rather than mutating in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::StratraderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    Momentum,
    Reversal,
    Breakout,
    Scalping,
    Swing,
}

impl std::fmt::Display for StrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StrategyType::Momentum => "momentum",
            StrategyType::Reversal => "reversal",
            StrategyType::Breakout => "breakout",
            StrategyType::Scalping => "scalping",
            StrategyType::Swing => "swing",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for StrategyType {
    type Err = StratraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "momentum" => Ok(StrategyType::Momentum),
            "reversal" => Ok(StrategyType::Reversal),
            "breakout" => Ok(StrategyType::Breakout),
            "scalping" => Ok(StrategyType::Scalping),
            "swing" => Ok(StrategyType::Swing),
            other => Err(StratraderError::InvalidParameters {
                reason: format!("unknown strategy type: {other}"),
            }),
        }
    }
}

/// Indicator thresholds evaluated by the entry/exit predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    pub sma_short: usize,
    pub sma_long: usize,
    pub macd_threshold: f64,
    pub volume_multiplier: f64,
}

/// Position sizing and protective exit parameters. A stop/take value of 0
/// disables that trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskManagement {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub max_position_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub id: String,
    pub strategy_type: StrategyType,
    pub conditions: Conditions,
    pub risk: RiskManagement,
    pub version: u32,
    pub updated: Option<NaiveDate>,
}

impl StrategyDefinition {
    /// Conventional starting parameter set for a strategy type.
    pub fn preset(id: &str, strategy_type: StrategyType) -> Self {
        let conditions = match strategy_type {
            StrategyType::Momentum => Conditions {
                rsi_lower: 40.0,
                rsi_upper: 70.0,
                sma_short: 10,
                sma_long: 30,
                macd_threshold: 0.0,
                volume_multiplier: 1.5,
            },
            StrategyType::Reversal => Conditions {
                rsi_lower: 30.0,
                rsi_upper: 70.0,
                sma_short: 10,
                sma_long: 30,
                macd_threshold: 0.0,
                volume_multiplier: 1.2,
            },
            StrategyType::Breakout => Conditions {
                rsi_lower: 50.0,
                rsi_upper: 80.0,
                sma_short: 10,
                sma_long: 30,
                macd_threshold: 0.0,
                volume_multiplier: 1.5,
            },
            StrategyType::Scalping => Conditions {
                rsi_lower: 35.0,
                rsi_upper: 65.0,
                sma_short: 5,
                sma_long: 15,
                macd_threshold: 0.0,
                volume_multiplier: 1.0,
            },
            StrategyType::Swing => Conditions {
                rsi_lower: 40.0,
                rsi_upper: 60.0,
                sma_short: 10,
                sma_long: 50,
                macd_threshold: 0.0,
                volume_multiplier: 1.0,
            },
        };

        StrategyDefinition {
            id: id.to_string(),
            strategy_type,
            conditions,
            risk: RiskManagement {
                stop_loss_pct: 5.0,
                take_profit_pct: 10.0,
                max_position_size: 0.25,
            },
            version: 1,
            updated: None,
        }
    }

    /// Parameter sanity checks, surfaced as `InvalidParameters`.
    pub fn validate(&self) -> Result<(), StratraderError> {
        let c = &self.conditions;
        if c.sma_short == 0 || c.sma_long == 0 {
            return Err(StratraderError::InvalidParameters {
                reason: "SMA periods must be positive".into(),
            });
        }
        if c.sma_short >= c.sma_long {
            return Err(StratraderError::InvalidParameters {
                reason: format!(
                    "sma_short ({}) must be less than sma_long ({})",
                    c.sma_short, c.sma_long
                ),
            });
        }
        if c.rsi_lower < 0.0 || c.rsi_lower >= c.rsi_upper {
            return Err(StratraderError::InvalidParameters {
                reason: format!(
                    "RSI bounds must satisfy 0 <= lower < upper, got ({}, {})",
                    c.rsi_lower, c.rsi_upper
                ),
            });
        }
        if c.volume_multiplier < 0.0 {
            return Err(StratraderError::InvalidParameters {
                reason: "volume_multiplier must be non-negative".into(),
            });
        }

        let r = &self.risk;
        if r.max_position_size <= 0.0 || r.max_position_size > 1.0 {
            return Err(StratraderError::InvalidParameters {
                reason: format!(
                    "max_position_size must be in (0, 1], got {}",
                    r.max_position_size
                ),
            });
        }
        if r.stop_loss_pct < 0.0 || r.take_profit_pct < 0.0 {
            return Err(StratraderError::InvalidParameters {
                reason: "stop_loss_pct and take_profit_pct must be non-negative".into(),
            });
        }

        Ok(())
    }

    /// The minimum bar count the simulator demands for this definition.
    pub fn required_bars(&self) -> usize {
        self.conditions.sma_long.max(crate::domain::indicator::DEFAULT_RSI_PERIOD)
    }
}
