//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::error::StratraderError;
use crate::domain::optimizer::optimize;
use crate::domain::scanner::{parse_symbols, scan, ScanConfig};
use crate::domain::strategy::{StrategyDefinition, StrategyType};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stratrader", about = "Indicator-driven strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest for the configured strategy
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Write the full result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search the strategy's parameter neighborhood for an improvement
    Optimize {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Write the resulting strategy definition as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rank trading opportunities across the configured universe
    Scan {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Assemble and validate the configured strategy without running it
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
        } => run_backtest_command(&config, symbol.as_deref(), output.as_ref()),
        Command::Optimize {
            config,
            symbol,
            output,
        } => run_optimize_command(&config, symbol.as_deref(), output.as_ref()),
        Command::Scan { config } => run_scan_command(&config),
        Command::Validate { config } => run_validate_command(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StratraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn config_date(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<NaiveDate, StratraderError> {
    let raw = adapter
        .get_string(section, key)
        .ok_or_else(|| StratraderError::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| StratraderError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
) -> Result<(BacktestConfig, NaiveDate, NaiveDate), StratraderError> {
    let start_date = config_date(adapter, "backtest", "start_date")?;
    let end_date = config_date(adapter, "backtest", "end_date")?;
    if end_date < start_date {
        return Err(StratraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "end_date".into(),
            reason: "end_date precedes start_date".into(),
        });
    }

    let config = BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", 100_000.0),
    };
    Ok((config, start_date, end_date))
}

/// Assemble a `StrategyDefinition` from the `[strategy]` section: the type's
/// preset parameters, each overridable by an explicit key.
pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<StrategyDefinition, StratraderError> {
    let type_str =
        adapter
            .get_string("strategy", "type")
            .ok_or_else(|| StratraderError::ConfigMissing {
                section: "strategy".into(),
                key: "type".into(),
            })?;
    let strategy_type: StrategyType = type_str.parse()?;

    let id = adapter
        .get_string("strategy", "id")
        .unwrap_or_else(|| type_str.to_lowercase());

    let mut def = StrategyDefinition::preset(&id, strategy_type);
    let c = &mut def.conditions;
    c.rsi_lower = adapter.get_double("strategy", "rsi_lower", c.rsi_lower);
    c.rsi_upper = adapter.get_double("strategy", "rsi_upper", c.rsi_upper);
    c.sma_short = adapter.get_int("strategy", "sma_short", c.sma_short as i64) as usize;
    c.sma_long = adapter.get_int("strategy", "sma_long", c.sma_long as i64) as usize;
    c.macd_threshold = adapter.get_double("strategy", "macd_threshold", c.macd_threshold);
    c.volume_multiplier = adapter.get_double("strategy", "volume_multiplier", c.volume_multiplier);

    let r = &mut def.risk;
    r.stop_loss_pct = adapter.get_double("strategy", "stop_loss", r.stop_loss_pct);
    r.take_profit_pct = adapter.get_double("strategy", "take_profit", r.take_profit_pct);
    r.max_position_size = adapter.get_double("strategy", "position_size", r.max_position_size);

    def.validate()?;
    Ok(def)
}

fn build_data_port(adapter: &dyn ConfigPort) -> Result<CsvAdapter, StratraderError> {
    let csv_dir =
        adapter
            .get_string("data", "csv_dir")
            .ok_or_else(|| StratraderError::ConfigMissing {
                section: "data".into(),
                key: "csv_dir".into(),
            })?;
    Ok(CsvAdapter::new(PathBuf::from(csv_dir)))
}

fn resolve_symbol(
    symbol_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<String, StratraderError> {
    match symbol_override {
        Some(s) => Ok(s.to_uppercase()),
        None => adapter
            .get_string("backtest", "symbol")
            .map(|s| s.to_uppercase())
            .ok_or_else(|| StratraderError::ConfigMissing {
                section: "backtest".into(),
                key: "symbol".into(),
            }),
    }
}

fn fetch_bars(
    port: &dyn DataPort,
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<crate::domain::ohlcv::PriceBar>, StratraderError> {
    let bars = port.fetch_ohlcv(symbol, start_date, end_date)?;
    if bars.is_empty() {
        return Err(StratraderError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(bars)
}

fn run_backtest_command(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match backtest_pipeline(&adapter, symbol_override) {
        Ok((symbol, def, result)) => {
            print_backtest_report(&symbol, &def, &result);
            if let Some(path) = output_path {
                if let Err(e) = write_json(path, &result) {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
                eprintln!("Result written to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn backtest_pipeline(
    adapter: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<(String, StrategyDefinition, BacktestResult), StratraderError> {
    let def = build_strategy(adapter)?;
    let (bt_config, start_date, end_date) = build_backtest_config(adapter)?;
    let symbol = resolve_symbol(symbol_override, adapter)?;
    let port = build_data_port(adapter)?;

    eprintln!("Backtesting {} with {} v{}", symbol, def.id, def.version);
    let bars = fetch_bars(&port, &symbol, start_date, end_date)?;
    let result = run_backtest(&bars, &def, &bt_config)?;
    Ok((symbol, def, result))
}

fn print_backtest_report(symbol: &str, def: &StrategyDefinition, result: &BacktestResult) {
    let m = &result.metrics;
    println!("Backtest: {symbol} / {} ({})", def.id, def.strategy_type);
    println!("  trades:        {}", m.closed_trades);
    println!("  won / lost:    {} / {}", m.trades_won, m.trades_lost);
    println!("  win rate:      {:.1}%", m.win_rate * 100.0);
    println!("  total return:  {:.2}%", m.total_return_pct);
    println!("  max drawdown:  {:.2}%", m.max_drawdown_pct);
    println!("  sharpe ratio:  {:.2}", m.sharpe_ratio);
    println!("  profit factor: {:.2}", m.profit_factor);
    println!("  final capital: {:.2}", result.final_capital);
}

fn run_optimize_command(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let outcome = (|| {
        let def = build_strategy(&adapter)?;
        let (bt_config, start_date, end_date) = build_backtest_config(&adapter)?;
        let symbol = resolve_symbol(symbol_override, &adapter)?;
        let port = build_data_port(&adapter)?;

        eprintln!("Optimizing {} on {}", def.id, symbol);
        let bars = fetch_bars(&port, &symbol, start_date, end_date)?;
        // stamp accepted variants with the end of the evaluated period
        optimize(&bars, &def, &bt_config, end_date)
    })();

    match outcome {
        Ok(outcome) => {
            if outcome.accepted {
                println!(
                    "Accepted variant v{} (score {:.2}% > baseline {:.2}%)",
                    outcome.strategy.version,
                    outcome.best_neighbor_score.unwrap_or_default(),
                    outcome.baseline_score,
                );
            } else {
                println!(
                    "Baseline retained at v{} (score {:.2}%)",
                    outcome.strategy.version, outcome.baseline_score,
                );
            }
            if let Some(path) = output_path {
                if let Err(e) = write_json(path, &outcome.strategy) {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
                eprintln!("Strategy written to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_scan_command(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = (|| {
        let symbols_raw =
            adapter
                .get_string("scan", "symbols")
                .ok_or_else(|| StratraderError::ConfigMissing {
                    section: "scan".into(),
                    key: "symbols".into(),
                })?;
        let universe = parse_symbols(&symbols_raw)?;
        let start_date = config_date(&adapter, "scan", "start_date")?;
        let end_date = config_date(&adapter, "scan", "end_date")?;
        let scan_config = ScanConfig {
            start_date,
            end_date,
            top_n: adapter.get_int("scan", "top_n", 10) as usize,
        };
        let port = build_data_port(&adapter)?;

        eprintln!("Scanning {} symbols...", universe.len());
        scan(&port, &universe, &scan_config)
    })();

    match result {
        Ok(opportunities) => {
            if opportunities.is_empty() {
                println!("No opportunities above the confidence floor.");
            }
            for op in &opportunities {
                println!(
                    "{:<8} {:>5.1}  close {:>10.2}  rsi {:>5.1}  [{}]",
                    op.symbol,
                    op.confidence,
                    op.last_close,
                    op.rsi,
                    op.signals.join(", "),
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate_command(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_strategy(&adapter) {
        Ok(def) => {
            println!(
                "OK: {} ({}) v{}, requires {} bars",
                def.id,
                def.strategy_type,
                def.version,
                def.required_bars(),
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn write_json<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<(), StratraderError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| StratraderError::Computation {
        reason: format!("serialization failed: {e}"),
    })?;
    fs::write(path, json)?;
    Ok(())
}
