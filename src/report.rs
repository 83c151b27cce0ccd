//reporting collaborator: flat-file exports and terminal tables built from
//completed backtest results; nothing here feeds back into the simulation

use crate::engine::BatchOutcome;
use crate::metrics::{EquityPoint, PerformanceSummary};
use crate::portfolio::Trade;
use anyhow::{Context, Result};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

//one row of a batch run, in a form that serializes cleanly: a failed run
//keeps its error message instead of a summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub strategy: String,
    pub symbol: String,
    pub summary: Option<PerformanceSummary>,
    pub error: Option<String>,
}

impl BatchRecord {
    pub fn from_outcome(outcome: &BatchOutcome) -> Self {
        match &outcome.result {
            Ok(result) => BatchRecord {
                strategy: outcome.strategy_name.clone(),
                symbol: outcome.symbol.clone(),
                summary: Some(result.summary.clone()),
                error: None,
            },
            Err(err) => BatchRecord {
                strategy: outcome.strategy_name.clone(),
                symbol: outcome.symbol.clone(),
                summary: None,
                error: Some(err.to_string()),
            },
        }
    }
}

pub fn records_from_outcomes(outcomes: &[BatchOutcome]) -> Vec<BatchRecord> {
    outcomes.iter().map(BatchRecord::from_outcome).collect()
}

pub fn save_equity_csv<P: AsRef<Path>>(equity_curve: &[EquityPoint], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path)
        .context(format!("Failed to create equity CSV {:?}", path))?;
    writeln!(file, "timestamp,cash,position_value,equity")?;

    for point in equity_curve {
        writeln!(
            file,
            "{},{},{},{}",
            point.timestamp.format("%Y-%m-%d"),
            point.cash,
            point.position_value,
            point.equity
        )?;
    }

    Ok(())
}

pub fn save_trades_csv<P: AsRef<Path>>(trades: &[Trade], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path)
        .context(format!("Failed to create trades CSV {:?}", path))?;
    writeln!(
        file,
        "entry_time,exit_time,entry_price,exit_price,qty,pnl"
    )?;

    for trade in trades {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            trade.entry_time.format("%Y-%m-%d"),
            trade.exit_time.format("%Y-%m-%d"),
            trade.entry_price,
            trade.exit_price,
            trade.qty,
            trade.pnl
        )?;
    }

    Ok(())
}

//persisted batch results, consumed later by the report command
pub fn save_batch_json<P: AsRef<Path>>(records: &[BatchRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).context(format!("Failed to write batch results {:?}", path))?;
    Ok(())
}

pub fn load_batch_json<P: AsRef<Path>>(path: P) -> Result<Vec<BatchRecord>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .context(format!("Failed to read batch results {:?}", path))?;
    let records: Vec<BatchRecord> = serde_json::from_str(&contents)?;
    Ok(records)
}

//comparison table across (strategy, symbol) pairs
pub fn comparison_table(records: &[BatchRecord]) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Strategy"),
        Cell::new("Symbol"),
        Cell::new("Total Return"),
        Cell::new("Annualized"),
        Cell::new("Volatility"),
        Cell::new("Sharpe"),
        Cell::new("Max DD"),
        Cell::new("Trades"),
        Cell::new("Win Rate"),
    ]));

    for record in records {
        match &record.summary {
            Some(summary) => {
                table.add_row(Row::new(vec![
                    Cell::new(&record.strategy),
                    Cell::new(&record.symbol),
                    Cell::new(&format!("{:.2}%", summary.total_return * 100.0)),
                    Cell::new(&format!("{:.2}%", summary.annualized_return * 100.0)),
                    Cell::new(&format!("{:.2}%", summary.volatility * 100.0)),
                    Cell::new(&format!("{:.3}", summary.sharpe_ratio)),
                    Cell::new(&format!("{:.2}%", summary.max_drawdown * 100.0)),
                    Cell::new(&format!("{}", summary.num_trades)),
                    Cell::new(&format!("{:.2}%", summary.win_rate * 100.0)),
                ]));
            }
            None => {
                table.add_row(Row::new(vec![
                    Cell::new(&record.strategy),
                    Cell::new(&record.symbol),
                    Cell::new(&format!(
                        "failed: {}",
                        record.error.as_deref().unwrap_or("unknown")
                    )),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                ]));
            }
        }
    }

    table
}

//flat stats CSV, one row per (strategy, symbol) pair
pub fn save_batch_stats_csv<P: AsRef<Path>>(records: &[BatchRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .context(format!("Failed to create batch stats CSV {:?}", path))?;

    writer.write_record([
        "strategy",
        "symbol",
        "total_return",
        "annualized_return",
        "volatility",
        "sharpe_ratio",
        "max_drawdown",
        "num_trades",
        "win_rate",
        "error",
    ])?;

    for record in records {
        match &record.summary {
            Some(summary) => writer.write_record([
                record.strategy.clone(),
                record.symbol.clone(),
                summary.total_return.to_string(),
                summary.annualized_return.to_string(),
                summary.volatility.to_string(),
                summary.sharpe_ratio.to_string(),
                summary.max_drawdown.to_string(),
                summary.num_trades.to_string(),
                summary.win_rate.to_string(),
                String::new(),
            ])?,
            None => writer.write_record([
                record.strategy.clone(),
                record.symbol.clone(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                record.error.clone().unwrap_or_default(),
            ])?,
        }
    }

    writer.flush()?;
    Ok(())
}

//markdown summary of a batch run
pub fn save_markdown_report<P: AsRef<Path>>(records: &[BatchRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path)
        .context(format!("Failed to create report {:?}", path))?;

    writeln!(file, "# Backtest Report")?;
    writeln!(file)?;
    writeln!(
        file,
        "| Strategy | Symbol | Total Return | Annualized | Volatility | Sharpe | Max DD | Trades | Win Rate |"
    )?;
    writeln!(file, "|---|---|---|---|---|---|---|---|---|")?;

    for record in records {
        match &record.summary {
            Some(s) => writeln!(
                file,
                "| {} | {} | {:.2}% | {:.2}% | {:.2}% | {:.3} | {:.2}% | {} | {:.2}% |",
                record.strategy,
                record.symbol,
                s.total_return * 100.0,
                s.annualized_return * 100.0,
                s.volatility * 100.0,
                s.sharpe_ratio,
                s.max_drawdown * 100.0,
                s.num_trades,
                s.win_rate * 100.0
            )?,
            None => writeln!(
                file,
                "| {} | {} | failed: {} | | | | | | |",
                record.strategy,
                record.symbol,
                record.error.as_deref().unwrap_or("unknown")
            )?,
        }
    }

    Ok(())
}
