//a Rust-based strategy backtesting engine for equities

pub mod config;
pub mod data;
pub mod engine;
pub mod metrics;
pub mod portfolio;
pub mod report;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        build_strategy, default_strategy_set, BatchConfig, ParamMap, StrategyConfig, StrategyKind,
    };
    pub use crate::data::{
        import_raw_csv, load_csv, validate_series, Bar, DataIntegrityError, PriceCache,
    };
    pub use crate::engine::{
        run_batch, Backtest, BacktestConfig, BacktestError, BacktestResult, BatchJob,
        BatchOutcome, SimulationResult, Simulator,
    };
    pub use crate::metrics::{
        max_drawdown, pct_change_returns, EquityPoint, PerformanceSummary, TRADING_DAYS_PER_YEAR,
    };
    pub use crate::portfolio::{PositionState, Trade};
    pub use crate::report::{
        comparison_table, load_batch_json, records_from_outcomes, save_batch_json,
        save_batch_stats_csv, save_equity_csv, save_markdown_report, save_trades_csv, BatchRecord,
    };
    pub use crate::strategy::{
        AtrTrailingStopStrategy, BollingerBandsStrategy, BuyAndHoldStrategy,
        ChannelBreakoutStrategy, ConfigurationError, MomentumStrategy, RsiReversionStrategy,
        Signal, SmaCrossoverStrategy, Strategy, TrendFilterStrategy,
    };
}
