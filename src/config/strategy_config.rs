use crate::metrics::TRADING_DAYS_PER_YEAR;
use crate::strategy::{
    AtrTrailingStopStrategy, BollingerBandsStrategy, BuyAndHoldStrategy, ChannelBreakoutStrategy,
    ConfigurationError, MomentumStrategy, RsiReversionStrategy, SmaCrossoverStrategy, Strategy,
    TrendFilterStrategy,
};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

//flat numeric parameter set, as found under `params:` in the YAML files
pub type ParamMap = BTreeMap<String, f64>;

//the closed set of strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    BuyAndHold,
    SmaCrossover,
    RsiReversion,
    BollingerBands,
    TrendFilter,
    Momentum,
    AtrTrailingStop,
    ChannelBreakout,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::BuyAndHold,
        StrategyKind::SmaCrossover,
        StrategyKind::RsiReversion,
        StrategyKind::BollingerBands,
        StrategyKind::TrendFilter,
        StrategyKind::Momentum,
        StrategyKind::AtrTrailingStop,
        StrategyKind::ChannelBreakout,
    ];

    //parse strategy kind from a config/CLI name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buy_and_hold" | "hold" => Some(StrategyKind::BuyAndHold),
            "sma" | "sma_crossover" => Some(StrategyKind::SmaCrossover),
            "rsi" | "rsi_reversion" => Some(StrategyKind::RsiReversion),
            "bollinger" | "bollinger_bands" => Some(StrategyKind::BollingerBands),
            "ma200" | "trend_filter" => Some(StrategyKind::TrendFilter),
            "momentum" => Some(StrategyKind::Momentum),
            "atr" | "atr_trailing_stop" => Some(StrategyKind::AtrTrailingStop),
            "donchian" | "channel_breakout" => Some(StrategyKind::ChannelBreakout),
            _ => None,
        }
    }

    //canonical config-file name
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::BuyAndHold => "buy_and_hold",
            StrategyKind::SmaCrossover => "sma_crossover",
            StrategyKind::RsiReversion => "rsi_reversion",
            StrategyKind::BollingerBands => "bollinger_bands",
            StrategyKind::TrendFilter => "trend_filter",
            StrategyKind::Momentum => "momentum",
            StrategyKind::AtrTrailingStop => "atr_trailing_stop",
            StrategyKind::ChannelBreakout => "channel_breakout",
        }
    }
}

fn int_param(params: &ParamMap, key: &'static str, default: usize) -> Result<usize, ConfigurationError> {
    match params.get(key) {
        None => Ok(default),
        Some(&value) => {
            if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 {
                Err(ConfigurationError::InvalidWindow { param: key, value })
            } else {
                Ok(value as usize)
            }
        }
    }
}

fn float_param(params: &ParamMap, key: &str, default: f64) -> f64 {
    //range checks happen in the strategy constructors
    params.get(key).copied().unwrap_or(default)
}

//builds a strategy from its kind and a flat parameter map, falling back to
//the stock defaults for absent parameters
pub fn build_strategy(
    kind: StrategyKind,
    params: &ParamMap,
) -> Result<Box<dyn Strategy>, ConfigurationError> {
    let strategy: Box<dyn Strategy> = match kind {
        StrategyKind::BuyAndHold => Box::new(BuyAndHoldStrategy::new()),
        StrategyKind::SmaCrossover => Box::new(SmaCrossoverStrategy::new(
            int_param(params, "fast", 20)?,
            int_param(params, "slow", 50)?,
        )?),
        StrategyKind::RsiReversion => Box::new(RsiReversionStrategy::new(
            int_param(params, "period", 14)?,
            float_param(params, "oversold", 30.0),
            float_param(params, "overbought", 70.0),
        )?),
        StrategyKind::BollingerBands => Box::new(BollingerBandsStrategy::new(
            int_param(params, "window", 20)?,
            float_param(params, "num_std", 2.0),
        )?),
        StrategyKind::TrendFilter => {
            Box::new(TrendFilterStrategy::new(int_param(params, "window", 200)?)?)
        }
        StrategyKind::Momentum => {
            Box::new(MomentumStrategy::new(int_param(params, "lookback", 90)?)?)
        }
        StrategyKind::AtrTrailingStop => Box::new(AtrTrailingStopStrategy::new(
            int_param(params, "period", 14)?,
            float_param(params, "multiplier", 3.0),
        )?),
        StrategyKind::ChannelBreakout => {
            Box::new(ChannelBreakoutStrategy::new(int_param(params, "window", 20)?)?)
        }
    };

    Ok(strategy)
}

//the full default strategy set in a stable order, for run-all and compare
pub fn default_strategy_set() -> Result<IndexMap<&'static str, Box<dyn Strategy>>, ConfigurationError>
{
    let empty = ParamMap::new();
    let mut set = IndexMap::new();
    for kind in StrategyKind::ALL {
        set.insert(kind.label(), build_strategy(kind, &empty)?);
    }
    Ok(set)
}

//a single-strategy YAML config file:
//
//  name: sma_crossover
//  params:
//    fast: 20
//    slow: 50
//  initial_cash: 100000
//  allocation: 1.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub name: String,
    #[serde(default)]
    pub params: ParamMap,
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
    #[serde(default = "default_allocation")]
    pub allocation: f64,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
}

fn default_initial_cash() -> f64 {
    100_000.0
}

fn default_allocation() -> f64 {
    1.0
}

fn default_periods_per_year() -> f64 {
    TRADING_DAYS_PER_YEAR
}

impl StrategyConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read strategy config {:?}", path))?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: StrategyConfig =
            serde_yaml::from_str(contents).context("Failed to parse strategy config YAML")?;
        Ok(config)
    }

    pub fn kind(&self) -> Result<StrategyKind, ConfigurationError> {
        StrategyKind::parse(&self.name)
            .ok_or_else(|| ConfigurationError::UnknownStrategy(self.name.clone()))
    }

    pub fn build(&self) -> Result<Box<dyn Strategy>, ConfigurationError> {
        build_strategy(self.kind()?, &self.params)
    }
}

//batch run configuration: which strategies on which symbols
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default = "default_strategy_names")]
    pub strategies: Vec<String>,
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
    #[serde(default = "default_allocation")]
    pub allocation: f64,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
}

fn default_strategy_names() -> Vec<String> {
    StrategyKind::ALL
        .iter()
        .map(|k| k.label().to_string())
        .collect()
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            symbols: Vec::new(),
            strategies: default_strategy_names(),
            initial_cash: default_initial_cash(),
            allocation: default_allocation(),
            periods_per_year: default_periods_per_year(),
        }
    }
}

impl BatchConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read batch config {:?}", path))?;
        let config: BatchConfig =
            serde_yaml::from_str(&contents).context("Failed to parse batch config YAML")?;
        Ok(config)
    }

    //resolves the configured strategy names into built strategies, in order
    pub fn build_strategies(
        &self,
    ) -> Result<Vec<(String, Box<dyn Strategy>)>, ConfigurationError> {
        let empty = ParamMap::new();
        self.strategies
            .iter()
            .map(|name| {
                let kind = StrategyKind::parse(name)
                    .ok_or_else(|| ConfigurationError::UnknownStrategy(name.clone()))?;
                Ok((name.clone(), build_strategy(kind, &empty)?))
            })
            .collect()
    }
}
