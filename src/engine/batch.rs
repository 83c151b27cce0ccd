use crate::data::Bar;
use crate::engine::backtest::{Backtest, BacktestConfig, BacktestError, BacktestResult};
use crate::strategy::Strategy;
use rayon::prelude::*;

//one (strategy, symbol) pair to simulate; each job owns its data so the
//workers share nothing
pub struct BatchJob {
    pub strategy_name: String,
    pub symbol: String,
    pub strategy: Box<dyn Strategy>,
    pub bars: Vec<Bar>,
    pub config: BacktestConfig,
}

//per-job outcome; a failed run carries its error instead of aborting the batch
pub struct BatchOutcome {
    pub strategy_name: String,
    pub symbol: String,
    pub result: Result<BacktestResult, BacktestError>,
}

//runs every job on the rayon pool; jobs are independent pure computations,
//so order of completion does not matter and results keep the input order
pub fn run_batch(jobs: Vec<BatchJob>) -> Vec<BatchOutcome> {
    jobs.into_par_iter()
        .map(|job| {
            let backtest = Backtest::new(job.config);
            let result = backtest.run(job.strategy.as_ref(), &job.bars);
            BatchOutcome {
                strategy_name: job.strategy_name,
                symbol: job.symbol,
                result,
            }
        })
        .collect()
}
