pub mod bollinger;
pub mod breakout;
pub mod buy_and_hold;
pub mod indicators;
pub mod momentum;
pub mod rsi_reversion;
pub mod sma_crossover;
pub mod trailing_stop;
pub mod trend_filter;

use crate::data::Bar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bollinger::BollingerBandsStrategy;
pub use breakout::ChannelBreakoutStrategy;
pub use buy_and_hold::BuyAndHoldStrategy;
pub use momentum::MomentumStrategy;
pub use rsi_reversion::RsiReversionStrategy;
pub use sma_crossover::SmaCrossoverStrategy;
pub use trailing_stop::AtrTrailingStopStrategy;
pub use trend_filter::TrendFilterStrategy;

//invalid strategy or engine parameters, rejected at construction time
//before any price data is touched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{param} must be a positive whole number (got {value})")]
    InvalidWindow { param: &'static str, value: f64 },
    #[error("fast window ({fast}) must be less than slow window ({slow})")]
    WindowOrder { fast: usize, slow: usize },
    #[error("oversold threshold ({oversold}) must be below overbought threshold ({overbought})")]
    ThresholdOrder { oversold: f64, overbought: f64 },
    #[error("{param} must be positive and finite (got {value})")]
    NonPositive { param: &'static str, value: f64 },
    #[error("allocation must lie in [0, 1] (got {0})")]
    InvalidAllocation(f64),
    #[error("initial cash must be positive and finite (got {0})")]
    InvalidInitialCash(f64),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

//discrete per-bar trading decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

//strategy interface: a pure function from a price history to one signal per bar
//
//implementations must be causal: the signal at index i may only depend on
//bars[..=i], and every bar before warmup() emits Hold
pub trait Strategy: Send + Sync {
    //generates exactly one signal per input bar, aligned by index
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal>;

    //number of leading bars that lack enough history for the strategy's
    //indicators; all of them emit Hold
    fn warmup(&self) -> usize;

    //returns the strategy name
    fn name(&self) -> &str;
}

//shared parameter checks used by the strategy constructors

pub(crate) fn require_window(param: &'static str, value: usize) -> Result<usize, ConfigurationError> {
    if value == 0 {
        return Err(ConfigurationError::InvalidWindow {
            param,
            value: 0.0,
        });
    }
    Ok(value)
}

pub(crate) fn require_positive(param: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigurationError::NonPositive { param, value });
    }
    Ok(value)
}
