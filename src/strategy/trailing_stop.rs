use crate::data::Bar;
use crate::strategy::indicators::{atr, prior_close_high};
use crate::strategy::{require_positive, require_window, ConfigurationError, Signal, Strategy};

//volatility-scaled trailing stop strategy
//enters long when the close makes a new period-high; exits when the close
//falls below the highest close since entry minus multiplier x atr(period)
//
//the stop tracking is internal bookkeeping over past bars only; the signal at
//index i never depends on bars after i
#[derive(Debug, Clone)]
pub struct AtrTrailingStopStrategy {
    period: usize,
    multiplier: f64,
}

impl AtrTrailingStopStrategy {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, ConfigurationError> {
        Ok(AtrTrailingStopStrategy {
            period: require_window("period", period)?,
            multiplier: require_positive("multiplier", multiplier)?,
        })
    }
}

impl Strategy for AtrTrailingStopStrategy {
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let mut signals = vec![Signal::Hold; bars.len()];

        let mut in_long = false;
        let mut highest_close = 0.0_f64;

        for i in self.warmup()..bars.len() {
            let close = closes[i];

            if !in_long {
                let breakout = match prior_close_high(&closes, i, self.period) {
                    Some(high) => close > high,
                    None => false,
                };
                if breakout {
                    signals[i] = Signal::Buy;
                    in_long = true;
                    highest_close = close;
                }
                continue;
            }

            highest_close = highest_close.max(close);
            let stop = match atr(bars, i, self.period) {
                Some(atr_value) => highest_close - self.multiplier * atr_value,
                None => continue,
            };

            if close < stop {
                signals[i] = Signal::Sell;
                in_long = false;
            }
        }

        signals
    }

    fn warmup(&self) -> usize {
        //atr needs a previous close for each of the period true ranges
        self.period + 1
    }

    fn name(&self) -> &str {
        "ATR Trailing Stop"
    }
}
