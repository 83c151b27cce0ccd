use crate::data::Bar;
use crate::strategy::indicators::{rolling_sma, rolling_std};
use crate::strategy::{require_positive, require_window, ConfigurationError, Signal, Strategy};

//bollinger band mean reversion strategy
//buys when the close crosses below the lower band (oversold touch)
//sells when the close crosses above the upper band (overbought touch)
#[derive(Debug, Clone)]
pub struct BollingerBandsStrategy {
    window: usize,
    num_std: f64,
}

impl BollingerBandsStrategy {
    pub fn new(window: usize, num_std: f64) -> Result<Self, ConfigurationError> {
        let window = require_window("window", window)?;
        if window < 2 {
            //band width needs a standard deviation, which needs two samples
            return Err(ConfigurationError::InvalidWindow {
                param: "window",
                value: window as f64,
            });
        }
        let num_std = require_positive("num_std", num_std)?;
        Ok(BollingerBandsStrategy { window, num_std })
    }

    fn bands(&self, closes: &[f64], i: usize) -> Option<(f64, f64)> {
        let mean = rolling_sma(closes, i, self.window)?;
        let std = rolling_std(closes, i, self.window)?;
        Some((mean - self.num_std * std, mean + self.num_std * std))
    }
}

impl Strategy for BollingerBandsStrategy {
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let mut signals = vec![Signal::Hold; bars.len()];

        for i in self.warmup()..bars.len() {
            let (lower, upper) = match self.bands(&closes, i) {
                Some(bands) => bands,
                None => continue,
            };
            let (prev_lower, prev_upper) = match self.bands(&closes, i - 1) {
                Some(bands) => bands,
                None => continue,
            };

            if closes[i] < lower && closes[i - 1] >= prev_lower {
                signals[i] = Signal::Buy;
            } else if closes[i] > upper && closes[i - 1] <= prev_upper {
                signals[i] = Signal::Sell;
            }
        }

        signals
    }

    fn warmup(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}
