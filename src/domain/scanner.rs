//! Market scanner.
//!
//! Scores each symbol of a universe with an additive heuristic over the
//! indicator set and ranks the results. A symbol whose fetch or scoring
//! fails is logged and skipped; the scan continues — partial results are the
//! deliberate policy here, unlike the backtest path which fails fast.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::StratraderError;
use crate::domain::indicator::{macd, rsi, sma, DEFAULT_FAST, DEFAULT_RSI_PERIOD, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::ohlcv::PriceBar;
use crate::domain::rule_eval::AVG_VOLUME_PERIOD;
use crate::ports::data_port::DataPort;

/// Bars required before a symbol is scored.
pub const MIN_SCAN_BARS: usize = 60;

/// Opportunities at or below this confidence are discarded.
pub const CONFIDENCE_FLOOR: f64 = 65.0;

/// Upper bound of the additive score.
pub const MAX_CONFIDENCE: f64 = 95.0;

// Fixed component weights of the additive score.
const TREND_CONFIRMED: f64 = 15.0;
const TREND_PARTIAL: f64 = 10.0;
const RSI_OVERSOLD: f64 = 20.0;
const RSI_NEUTRAL: f64 = 10.0;
const MACD_POSITIVE: f64 = 15.0;
const NEAR_SUPPORT: f64 = 15.0;
const VOLUME_SPIKE: f64 = 15.0;
const MOMENTUM_CONTINUITY: f64 = 15.0;

const VOLUME_SPIKE_RATIO: f64 = 1.5;
const SUPPORT_PERCENTILE: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub top_n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub symbol: String,
    pub confidence: f64,
    pub last_close: f64,
    pub rsi: f64,
    pub signals: Vec<&'static str>,
}

/// Parse a comma-separated symbol list into an uppercase universe.
/// Empty tokens and duplicates are configuration mistakes, not data noise.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, StratraderError> {
    let mut symbols = Vec::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(StratraderError::InvalidParameters {
                reason: "empty token in symbol list".into(),
            });
        }
        let symbol = trimmed.to_uppercase();
        if symbols.contains(&symbol) {
            return Err(StratraderError::InvalidParameters {
                reason: format!("duplicate symbol: {symbol}"),
            });
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Scan `universe` through `port`, returning at most `top_n` opportunities
/// with confidence above the floor, best first.
pub fn scan(
    port: &dyn DataPort,
    universe: &[String],
    config: &ScanConfig,
) -> Result<Vec<Opportunity>, StratraderError> {
    if universe.is_empty() {
        return Err(StratraderError::InvalidParameters {
            reason: "scan universe is empty".into(),
        });
    }
    if config.top_n == 0 {
        return Err(StratraderError::InvalidParameters {
            reason: "top_n must be positive".into(),
        });
    }

    let mut opportunities = Vec::new();

    for symbol in universe {
        let bars = match port.fetch_ohlcv(symbol, config.start_date, config.end_date) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {symbol} ({e})");
                continue;
            }
        };

        if bars.len() < MIN_SCAN_BARS {
            eprintln!(
                "warning: skipping {symbol} (only {} bars, minimum {} required)",
                bars.len(),
                MIN_SCAN_BARS
            );
            continue;
        }

        match score_symbol(symbol, &bars) {
            Some(op) if op.confidence > CONFIDENCE_FLOOR => opportunities.push(op),
            Some(_) | None => {}
        }
    }

    opportunities.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    opportunities.truncate(config.top_n);

    Ok(opportunities)
}

/// Score one symbol's bars. `None` when an indicator comes up empty despite
/// the bar-count precheck.
pub fn score_symbol(symbol: &str, bars: &[PriceBar]) -> Option<Opportunity> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

    let rsi_series = rsi(&closes, DEFAULT_RSI_PERIOD);
    let sma_short = sma(&closes, 10);
    let sma_long = sma(&closes, 30);
    let macd_series = macd(&closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
    let avg_volume = sma(&volumes, AVG_VOLUME_PERIOD);

    let last_rsi = *rsi_series.last()?;
    let last_sma_short = *sma_short.last()?;
    let last_sma_long = *sma_long.last()?;
    let last_macd = *macd_series.macd.last()?;
    let last_avg_volume = *avg_volume.last()?;

    let last = bars.last()?;
    let close = last.close;

    let mut confidence = 0.0;
    let mut signals = Vec::new();

    if close > last_sma_short && last_sma_short > last_sma_long {
        confidence += TREND_CONFIRMED;
        signals.push("trend confirmed");
    } else if close > last_sma_long {
        confidence += TREND_PARTIAL;
        signals.push("above long average");
    }

    if last_rsi < 30.0 {
        confidence += RSI_OVERSOLD;
        signals.push("rsi oversold");
    } else if (40.0..=60.0).contains(&last_rsi) {
        confidence += RSI_NEUTRAL;
        signals.push("rsi neutral");
    }

    if last_macd > 0.0 {
        confidence += MACD_POSITIVE;
        signals.push("macd positive");
    }

    if close <= percentile(&closes, SUPPORT_PERCENTILE) {
        confidence += NEAR_SUPPORT;
        signals.push("near support");
    }

    if last_avg_volume > 0.0 && last.volume as f64 > last_avg_volume * VOLUME_SPIKE_RATIO {
        confidence += VOLUME_SPIKE;
        signals.push("volume spike");
    }

    let n = closes.len();
    if n >= 4 && closes[n - 3] > closes[n - 4] && closes[n - 2] > closes[n - 3] && closes[n - 1] > closes[n - 2] {
        confidence += MOMENTUM_CONTINUITY;
        signals.push("momentum continuity");
    }

    Some(Opportunity {
        symbol: symbol.to_string(),
        confidence: confidence.min(MAX_CONFIDENCE),
        last_close: close,
        rsi: last_rsi,
        signals,
    })
}

/// Value at the given fraction of the sorted sample (nearest-rank below).
fn percentile(values: &[f64], fraction: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (fraction * (sorted.len() - 1) as f64).floor() as usize;
    sorted[rank]
}
