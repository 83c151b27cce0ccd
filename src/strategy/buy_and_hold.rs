use crate::data::Bar;
use crate::strategy::{Signal, Strategy};

//baseline strategy: buy on the first bar and never exit
//useful as the benchmark every other strategy is compared against
#[derive(Debug, Clone, Default)]
pub struct BuyAndHoldStrategy;

impl BuyAndHoldStrategy {
    pub fn new() -> Self {
        BuyAndHoldStrategy
    }
}

impl Strategy for BuyAndHoldStrategy {
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let mut signals = vec![Signal::Hold; bars.len()];
        if let Some(first) = signals.first_mut() {
            *first = Signal::Buy;
        }
        signals
    }

    fn warmup(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "Buy & Hold"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testutil::bars_from_closes;

    #[test]
    fn buys_once_then_holds() {
        let bars = bars_from_closes(&[100.0, 101.0, 102.0]);
        let signals = BuyAndHoldStrategy::new().generate_signals(&bars);
        assert_eq!(signals, vec![Signal::Buy, Signal::Hold, Signal::Hold]);
    }

    #[test]
    fn empty_history_yields_no_signals() {
        let signals = BuyAndHoldStrategy::new().generate_signals(&[]);
        assert!(signals.is_empty());
    }
}
