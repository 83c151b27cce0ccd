use crate::metrics::timeseries::{max_drawdown, pct_change_returns, EquityPoint};
use crate::portfolio::Trade;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//trading periods per year for daily bars
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

//standardized performance statistics derived from a completed equity curve
//
//all numeric edge cases (flat curve, no trades, single-point history) resolve
//to zeros rather than NaN or errors, so a strategy that never trades still
//produces a well-defined summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub initial_equity: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub num_trades: usize,
    pub win_rate: f64,
}

impl PerformanceSummary {
    //calculate summary statistics from equity curve and closed trades
    pub fn from_backtest(
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        periods_per_year: f64,
    ) -> Self {
        let initial_equity = equity_curve.first().map(|p| p.equity).unwrap_or(0.0);
        let final_equity = equity_curve.last().map(|p| p.equity).unwrap_or(0.0);

        let total_return = if initial_equity > 0.0 {
            final_equity / initial_equity - 1.0
        } else {
            0.0
        };

        let num_periods = equity_curve.len().saturating_sub(1);
        let annualized_return = if num_periods > 0 {
            (1.0 + total_return).powf(periods_per_year / num_periods as f64) - 1.0
        } else {
            0.0
        };

        let equity_values: Vec<f64> = equity_curve.iter().map(|p| p.equity).collect();
        let returns = pct_change_returns(&equity_values);

        let (volatility, sharpe_ratio) = if returns.len() >= 2 {
            let mean = returns.as_slice().mean();
            let std_dev = returns.as_slice().std_dev();

            if std_dev > 0.0 {
                (
                    std_dev * periods_per_year.sqrt(),
                    (mean / std_dev) * periods_per_year.sqrt(),
                )
            } else {
                //flat equity curve: zero by contract, never NaN
                (0.0, 0.0)
            }
        } else {
            (0.0, 0.0)
        };

        let num_trades = trades.len();
        let win_rate = if num_trades > 0 {
            trades.iter().filter(|t| t.is_winner()).count() as f64 / num_trades as f64
        } else {
            0.0
        };

        PerformanceSummary {
            initial_equity,
            final_equity,
            total_return,
            annualized_return,
            volatility,
            sharpe_ratio,
            max_drawdown: max_drawdown(equity_curve),
            num_trades,
            win_rate,
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Initial Equity"),
            Cell::new(&format!("${:.2}", self.initial_equity)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Final Equity"),
            Cell::new(&format!("${:.2}", self.final_equity)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Total Return"),
            Cell::new(&format!("{:.2}%", self.total_return * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Annualized Return"),
            Cell::new(&format!("{:.2}%", self.annualized_return * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Volatility"),
            Cell::new(&format!("{:.2}%", self.volatility * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Sharpe Ratio"),
            Cell::new(&format!("{:.3}", self.sharpe_ratio)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Max Drawdown"),
            Cell::new(&format!("{:.2}%", self.max_drawdown * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Number of Trades"),
            Cell::new(&format!("{}", self.num_trades)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Win Rate"),
            Cell::new(&format!("{:.2}%", self.win_rate * 100.0)),
        ]));

        table.printstd();
    }
}
