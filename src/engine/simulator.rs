use crate::data::{validate_series, Bar, DataIntegrityError};
use crate::metrics::EquityPoint;
use crate::portfolio::{PositionState, Trade};
use crate::strategy::{ConfigurationError, Signal};

//outcome of a single simulation run: one equity point per bar plus the list
//of closed round trips; nothing here is mutated after run() returns
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    //buy signals that could not afford a single share; no-ops, not errors
    pub skipped_signals: usize,
}

//converts a signal series into a realized position-and-cash trajectory
//
//execution timing: a signal emitted on bar t (from its close) is executed at
//bar t+1's open, never on the same bar; a signal on the final bar is never
//executed because no next bar exists
pub struct Simulator {
    initial_cash: f64,
    allocation: f64,
}

impl Simulator {
    pub fn new(initial_cash: f64, allocation: f64) -> Result<Self, ConfigurationError> {
        if !initial_cash.is_finite() || initial_cash <= 0.0 {
            return Err(ConfigurationError::InvalidInitialCash(initial_cash));
        }
        if !allocation.is_finite() || !(0.0..=1.0).contains(&allocation) {
            return Err(ConfigurationError::InvalidAllocation(allocation));
        }
        Ok(Simulator {
            initial_cash,
            allocation,
        })
    }

    pub fn run(
        &self,
        bars: &[Bar],
        signals: &[Signal],
    ) -> Result<SimulationResult, DataIntegrityError> {
        //all integrity checks happen once, up front; the loop below never fails
        if signals.len() != bars.len() {
            return Err(DataIntegrityError::SignalLengthMismatch {
                bars: bars.len(),
                signals: signals.len(),
            });
        }
        validate_series(bars)?;

        let mut cash = self.initial_cash;
        let mut position = PositionState::Flat;
        let mut equity_curve = Vec::with_capacity(bars.len());
        let mut trades = Vec::new();
        let mut skipped_signals = 0;

        //the signal carried over from the previous bar, due for execution at
        //this bar's open
        let mut pending: Option<Signal> = None;

        for (i, bar) in bars.iter().enumerate() {
            if let Some(signal) = pending.take() {
                match (signal, &position) {
                    (Signal::Buy, PositionState::Flat) => {
                        let qty = ((cash * self.allocation) / bar.open).floor() as u64;
                        if qty == 0 {
                            skipped_signals += 1;
                        } else {
                            cash -= qty as f64 * bar.open;
                            position = PositionState::Long {
                                qty,
                                entry_price: bar.open,
                                opened_at: bar.timestamp,
                            };
                        }
                    }
                    (
                        Signal::Sell,
                        PositionState::Long {
                            qty,
                            entry_price,
                            opened_at,
                        },
                    ) => {
                        cash += *qty as f64 * bar.open;
                        trades.push(Trade {
                            entry_time: *opened_at,
                            exit_time: bar.timestamp,
                            entry_price: *entry_price,
                            exit_price: bar.open,
                            qty: *qty,
                            pnl: (bar.open - entry_price) * *qty as f64,
                        });
                        position = PositionState::Flat;
                    }
                    //buy while long and sell while flat are no-ops
                    _ => {}
                }
            }

            //one equity point per bar, marked to this bar's close, whether or
            //not a transaction happened
            equity_curve.push(EquityPoint::new(
                bar.timestamp,
                cash,
                position.market_value(bar.close),
            ));

            pending = match signals[i] {
                Signal::Hold => None,
                signal => Some(signal),
            };
        }

        Ok(SimulationResult {
            equity_curve,
            trades,
            skipped_signals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testutil::bars_from_closes;

    fn hold_only(n: usize) -> Vec<Signal> {
        vec![Signal::Hold; n]
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            Simulator::new(0.0, 1.0),
            Err(ConfigurationError::InvalidInitialCash(_))
        ));
        assert!(matches!(
            Simulator::new(1000.0, 1.5),
            Err(ConfigurationError::InvalidAllocation(_))
        ));
        assert!(matches!(
            Simulator::new(1000.0, -0.1),
            Err(ConfigurationError::InvalidAllocation(_))
        ));
    }

    #[test]
    fn rejects_signal_length_mismatch() {
        let bars = bars_from_closes(&[100.0, 101.0]);
        let simulator = Simulator::new(1000.0, 1.0).unwrap();
        assert!(matches!(
            simulator.run(&bars, &hold_only(3)),
            Err(DataIntegrityError::SignalLengthMismatch { bars: 2, signals: 3 })
        ));
    }

    #[test]
    fn rejects_malformed_series_before_simulating() {
        let mut bars = bars_from_closes(&[100.0, 101.0, 102.0]);
        bars[1].close = f64::NAN;
        let simulator = Simulator::new(1000.0, 1.0).unwrap();
        assert!(simulator.run(&bars, &hold_only(3)).is_err());
    }

    #[test]
    fn never_trading_keeps_equity_flat() {
        //five bars at 100, signal always Hold: equity never moves
        let bars = bars_from_closes(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let simulator = Simulator::new(100.0, 1.0).unwrap();
        let result = simulator.run(&bars, &hold_only(5)).unwrap();

        assert_eq!(result.equity_curve.len(), 5);
        assert!(result.equity_curve.iter().all(|p| p.equity == 100.0));
        assert!(result.trades.is_empty());
        assert_eq!(result.skipped_signals, 0);
    }

    #[test]
    fn signal_executes_at_next_bar_open() {
        //closes [100, 110, ...]: open of bar 1 is 100 (previous close)
        let bars = bars_from_closes(&[100.0, 110.0, 105.0, 120.0, 90.0]);
        let mut signals = hold_only(5);
        signals[0] = Signal::Buy;
        signals[2] = Signal::Sell;

        let simulator = Simulator::new(1000.0, 1.0).unwrap();
        let result = simulator.run(&bars, &signals).unwrap();

        //buy executes at bars[1].open == 100: qty 10, cash 0
        assert_eq!(result.equity_curve[0].equity, 1000.0);
        assert_eq!(result.equity_curve[1].cash, 0.0);
        assert_eq!(result.equity_curve[1].position_value, 10.0 * 110.0);

        //sell executes at bars[3].open == 105
        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.entry_price, 100.0);
        assert_eq!(trade.exit_price, 105.0);
        assert_eq!(trade.qty, 10);
        assert_eq!(trade.pnl, 50.0);
        assert!(trade.exit_time > trade.entry_time);

        //after the exit, equity is pure cash
        assert_eq!(result.equity_curve[3].cash, 1050.0);
        assert_eq!(result.equity_curve[3].position_value, 0.0);
        assert_eq!(result.equity_curve[4].equity, 1050.0);
    }

    #[test]
    fn final_bar_signal_is_never_executed() {
        let bars = bars_from_closes(&[100.0, 101.0, 102.0]);
        let mut signals = hold_only(3);
        signals[2] = Signal::Buy;

        let simulator = Simulator::new(1000.0, 1.0).unwrap();
        let result = simulator.run(&bars, &signals).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.equity_curve[2].position_value, 0.0);
        assert_eq!(result.equity_curve[2].cash, 1000.0);
    }

    #[test]
    fn buy_while_long_and_sell_while_flat_are_noops() {
        let bars = bars_from_closes(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let mut signals = hold_only(5);
        signals[0] = Signal::Sell; //flat: ignored
        signals[1] = Signal::Buy;
        signals[2] = Signal::Buy; //already long: ignored

        let simulator = Simulator::new(1000.0, 1.0).unwrap();
        let result = simulator.run(&bars, &signals).unwrap();

        assert!(result.trades.is_empty());
        //a single 10-share position opened at 100
        assert_eq!(result.equity_curve[4].position_value, 1000.0);
        assert_eq!(result.equity_curve[4].cash, 0.0);
        assert_eq!(result.skipped_signals, 0);
    }

    #[test]
    fn unaffordable_buy_is_skipped_not_an_error() {
        let bars = bars_from_closes(&[100.0, 110.0, 110.0]);
        let mut signals = hold_only(3);
        signals[0] = Signal::Buy;

        //cash 50 cannot afford one share at 100
        let simulator = Simulator::new(50.0, 1.0).unwrap();
        let result = simulator.run(&bars, &signals).unwrap();

        assert_eq!(result.skipped_signals, 1);
        assert!(result.trades.is_empty());
        assert!(result.equity_curve.iter().all(|p| p.equity == 50.0));
    }

    #[test]
    fn allocation_fraction_limits_position_size() {
        let bars = bars_from_closes(&[100.0, 100.0, 100.0]);
        let mut signals = hold_only(3);
        signals[0] = Signal::Buy;

        let simulator = Simulator::new(1000.0, 0.5).unwrap();
        let result = simulator.run(&bars, &signals).unwrap();

        //half of 1000 at 100/share buys 5 shares
        assert_eq!(result.equity_curve[1].position_value, 500.0);
        assert_eq!(result.equity_curve[1].cash, 500.0);
    }

    #[test]
    fn cash_never_goes_negative() {
        let bars = bars_from_closes(&[100.0, 103.0, 101.0, 107.0, 105.0]);
        let mut signals = hold_only(5);
        signals[0] = Signal::Buy;

        let simulator = Simulator::new(1050.0, 1.0).unwrap();
        let result = simulator.run(&bars, &signals).unwrap();
        assert!(result.equity_curve.iter().all(|p| p.cash >= 0.0));
    }

    #[test]
    fn identical_inputs_produce_identical_outputs() {
        let bars = bars_from_closes(&[100.0, 104.0, 98.0, 110.0, 95.0, 120.0]);
        let mut signals = hold_only(6);
        signals[1] = Signal::Buy;
        signals[4] = Signal::Sell;

        let simulator = Simulator::new(10_000.0, 0.8).unwrap();
        let first = simulator.run(&bars, &signals).unwrap();
        let second = simulator.run(&bars, &signals).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn curve_length_always_matches_bar_count() {
        for n in 1..8 {
            let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
            let bars = bars_from_closes(&closes);
            let mut signals = hold_only(n);
            if n > 1 {
                signals[0] = Signal::Buy;
            }
            let simulator = Simulator::new(1000.0, 1.0).unwrap();
            let result = simulator.run(&bars, &signals).unwrap();
            assert_eq!(result.equity_curve.len(), n);
        }
    }
}
