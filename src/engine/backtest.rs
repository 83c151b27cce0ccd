use crate::data::{Bar, DataIntegrityError};
use crate::engine::simulator::Simulator;
use crate::metrics::{EquityPoint, PerformanceSummary, TRADING_DAYS_PER_YEAR};
use crate::portfolio::Trade;
use crate::strategy::{ConfigurationError, Strategy};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Data(#[from] DataIntegrityError),
}

//configuration for a backtest
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    pub allocation: f64,
    pub periods_per_year: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: 100_000.0,
            allocation: 1.0,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

//result of a backtest
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub summary: PerformanceSummary,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub skipped_signals: usize,
}

//wires a strategy's signals through the simulator and summarizes the outcome
pub struct Backtest {
    config: BacktestConfig,
}

impl Backtest {
    pub fn new(config: BacktestConfig) -> Self {
        Backtest { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn run(
        &self,
        strategy: &dyn Strategy,
        bars: &[Bar],
    ) -> Result<BacktestResult, BacktestError> {
        let simulator = Simulator::new(self.config.initial_cash, self.config.allocation)?;
        let signals = strategy.generate_signals(bars);
        let simulation = simulator.run(bars, &signals)?;

        let summary = PerformanceSummary::from_backtest(
            &simulation.equity_curve,
            &simulation.trades,
            self.config.periods_per_year,
        );

        Ok(BacktestResult {
            summary,
            equity_curve: simulation.equity_curve,
            trades: simulation.trades,
            skipped_signals: simulation.skipped_signals,
        })
    }
}
