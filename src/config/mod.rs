pub mod strategy_config;

pub use strategy_config::{
    build_strategy, default_strategy_set, BatchConfig, ParamMap, StrategyConfig, StrategyKind,
};
