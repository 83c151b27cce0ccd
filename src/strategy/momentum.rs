use crate::data::Bar;
use crate::strategy::{require_window, ConfigurationError, Signal, Strategy};

//lookback momentum strategy
//buys when the trailing lookback return turns positive, sells when it turns
//negative; a return that stays on one side of zero emits no further signals
#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    lookback: usize,
}

impl MomentumStrategy {
    pub fn new(lookback: usize) -> Result<Self, ConfigurationError> {
        Ok(MomentumStrategy {
            lookback: require_window("lookback", lookback)?,
        })
    }

    fn lookback_return(&self, closes: &[f64], i: usize) -> Option<f64> {
        if i < self.lookback {
            return None;
        }
        Some(closes[i] / closes[i - self.lookback] - 1.0)
    }
}

impl Strategy for MomentumStrategy {
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let mut signals = vec![Signal::Hold; bars.len()];

        for i in self.warmup()..bars.len() {
            let (current, previous) = match (
                self.lookback_return(&closes, i),
                self.lookback_return(&closes, i - 1),
            ) {
                (Some(c), Some(p)) => (c, p),
                _ => continue,
            };

            if current > 0.0 && previous <= 0.0 {
                signals[i] = Signal::Buy;
            } else if current < 0.0 && previous >= 0.0 {
                signals[i] = Signal::Sell;
            }
        }

        signals
    }

    fn warmup(&self) -> usize {
        //the sign change needs the return on this bar and the previous one
        self.lookback + 1
    }

    fn name(&self) -> &str {
        "Momentum"
    }
}
