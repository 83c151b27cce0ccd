pub mod backtest;
pub mod batch;
pub mod simulator;

pub use backtest::{Backtest, BacktestConfig, BacktestError, BacktestResult};
pub use batch::{run_batch, BatchJob, BatchOutcome};
pub use simulator::{SimulationResult, Simulator};
