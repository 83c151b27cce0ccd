use crate::data::Bar;
use crate::strategy::indicators::rolling_sma;
use crate::strategy::{require_window, ConfigurationError, Signal, Strategy};

//long-window trend regime filter (the classic 200-day moving average)
//buys when the close crosses above the window sma, sells when it crosses below
#[derive(Debug, Clone)]
pub struct TrendFilterStrategy {
    window: usize,
}

impl TrendFilterStrategy {
    pub fn new(window: usize) -> Result<Self, ConfigurationError> {
        Ok(TrendFilterStrategy {
            window: require_window("window", window)?,
        })
    }
}

impl Strategy for TrendFilterStrategy {
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let mut signals = vec![Signal::Hold; bars.len()];

        for i in self.warmup()..bars.len() {
            let (ma, prev_ma) = match (
                rolling_sma(&closes, i, self.window),
                rolling_sma(&closes, i - 1, self.window),
            ) {
                (Some(m), Some(p)) => (m, p),
                _ => continue,
            };

            if closes[i] > ma && closes[i - 1] <= prev_ma {
                signals[i] = Signal::Buy;
            } else if closes[i] < ma && closes[i - 1] >= prev_ma {
                signals[i] = Signal::Sell;
            }
        }

        signals
    }

    fn warmup(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "Trend Filter"
    }
}
