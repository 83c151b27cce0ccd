use crate::data::Bar;
use crate::strategy::indicators::rolling_sma;
use crate::strategy::{require_window, ConfigurationError, Signal, Strategy};

//sma crossover strategy
//buys on a golden cross (fast sma crosses above slow sma)
//sells on a death cross (fast sma crosses below slow sma)
#[derive(Debug, Clone)]
pub struct SmaCrossoverStrategy {
    fast: usize,
    slow: usize,
}

impl SmaCrossoverStrategy {
    pub fn new(fast: usize, slow: usize) -> Result<Self, ConfigurationError> {
        let fast = require_window("fast", fast)?;
        let slow = require_window("slow", slow)?;
        if fast >= slow {
            return Err(ConfigurationError::WindowOrder { fast, slow });
        }
        Ok(SmaCrossoverStrategy { fast, slow })
    }
}

impl Strategy for SmaCrossoverStrategy {
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let mut signals = vec![Signal::Hold; bars.len()];

        for i in self.warmup()..bars.len() {
            let (fast, slow) = match (
                rolling_sma(&closes, i, self.fast),
                rolling_sma(&closes, i, self.slow),
            ) {
                (Some(f), Some(s)) => (f, s),
                _ => continue,
            };
            let (prev_fast, prev_slow) = match (
                rolling_sma(&closes, i - 1, self.fast),
                rolling_sma(&closes, i - 1, self.slow),
            ) {
                (Some(f), Some(s)) => (f, s),
                _ => continue,
            };

            if prev_fast <= prev_slow && fast > slow {
                signals[i] = Signal::Buy;
            } else if prev_fast >= prev_slow && fast < slow {
                signals[i] = Signal::Sell;
            }
        }

        signals
    }

    fn warmup(&self) -> usize {
        //a crossover needs both smas on this bar and the previous one
        self.slow
    }

    fn name(&self) -> &str {
        "SMA Crossover"
    }
}
