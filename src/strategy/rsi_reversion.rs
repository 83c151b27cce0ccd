use crate::data::Bar;
use crate::strategy::indicators::rsi;
use crate::strategy::{require_window, ConfigurationError, Signal, Strategy};

//rsi mean reversion strategy
//buys when rsi crosses down through the oversold threshold
//sells when rsi crosses up through the overbought threshold
//signals fire on the crossing only, not while rsi stays beyond a threshold
#[derive(Debug, Clone)]
pub struct RsiReversionStrategy {
    period: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiReversionStrategy {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self, ConfigurationError> {
        let period = require_window("period", period)?;
        if !oversold.is_finite() || !overbought.is_finite() || oversold >= overbought {
            return Err(ConfigurationError::ThresholdOrder {
                oversold,
                overbought,
            });
        }
        Ok(RsiReversionStrategy {
            period,
            oversold,
            overbought,
        })
    }
}

impl Strategy for RsiReversionStrategy {
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let mut signals = vec![Signal::Hold; bars.len()];

        for i in self.warmup()..bars.len() {
            let (current, previous) = match (
                rsi(&closes, i, self.period),
                rsi(&closes, i - 1, self.period),
            ) {
                (Some(c), Some(p)) => (c, p),
                _ => continue,
            };

            if current < self.oversold && previous >= self.oversold {
                signals[i] = Signal::Buy;
            } else if current > self.overbought && previous <= self.overbought {
                signals[i] = Signal::Sell;
            }
        }

        signals
    }

    fn warmup(&self) -> usize {
        //rsi needs period+1 closes, the crossing needs one more bar
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI Reversion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testutil::{assert_warmup_holds, bars_from_closes};

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            RsiReversionStrategy::new(0, 30.0, 70.0),
            Err(ConfigurationError::InvalidWindow { param: "period", .. })
        ));
        assert!(matches!(
            RsiReversionStrategy::new(14, 70.0, 30.0),
            Err(ConfigurationError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn oversold_crossing_emits_buy() {
        //flat then falling: rsi goes from 100 (no losses) to 0
        let bars = bars_from_closes(&[100.0, 100.0, 100.0, 100.0, 99.0, 98.0]);
        let strategy = RsiReversionStrategy::new(3, 30.0, 70.0).unwrap();
        let signals = strategy.generate_signals(&bars);
        assert_eq!(signals[4], Signal::Buy);
        //already below the threshold on the next bar: no repeat signal
        assert_eq!(signals[5], Signal::Hold);
    }

    #[test]
    fn overbought_crossing_emits_sell() {
        //falling then rallying: rsi goes from 0 to 100
        let bars = bars_from_closes(&[100.0, 99.0, 98.0, 97.0, 98.0, 99.0, 100.0, 101.0]);
        let strategy = RsiReversionStrategy::new(3, 30.0, 70.0).unwrap();
        let signals = strategy.generate_signals(&bars);
        assert!(signals.contains(&Signal::Sell));
    }

    #[test]
    fn warmup_is_all_hold() {
        let bars = bars_from_closes(&[100.0, 90.0, 95.0, 85.0, 92.0, 88.0]);
        let strategy = RsiReversionStrategy::new(3, 30.0, 70.0).unwrap();
        assert_warmup_holds(&strategy, &bars);
    }
}
