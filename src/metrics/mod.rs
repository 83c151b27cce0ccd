pub mod summary;
pub mod timeseries;

pub use summary::{PerformanceSummary, TRADING_DAYS_PER_YEAR};
pub use timeseries::{max_drawdown, pct_change_returns, EquityPoint};
