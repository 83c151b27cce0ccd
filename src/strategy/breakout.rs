use crate::data::Bar;
use crate::strategy::indicators::{prior_high, prior_low};
use crate::strategy::{require_window, ConfigurationError, Signal, Strategy};

//donchian channel breakout strategy
//buys when the close exceeds the highest high of the prior window
//sells when the close falls below the lowest low of the prior window
#[derive(Debug, Clone)]
pub struct ChannelBreakoutStrategy {
    window: usize,
}

impl ChannelBreakoutStrategy {
    pub fn new(window: usize) -> Result<Self, ConfigurationError> {
        Ok(ChannelBreakoutStrategy {
            window: require_window("window", window)?,
        })
    }
}

impl Strategy for ChannelBreakoutStrategy {
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let mut signals = vec![Signal::Hold; bars.len()];

        for i in self.warmup()..bars.len() {
            let (upper, lower) = match (
                prior_high(bars, i, self.window),
                prior_low(bars, i, self.window),
            ) {
                (Some(u), Some(l)) => (u, l),
                _ => continue,
            };

            if bars[i].close > upper {
                signals[i] = Signal::Buy;
            } else if bars[i].close < lower {
                signals[i] = Signal::Sell;
            }
        }

        signals
    }

    fn warmup(&self) -> usize {
        //the channel is built from the window of bars strictly before i
        self.window
    }

    fn name(&self) -> &str {
        "Channel Breakout"
    }
}
