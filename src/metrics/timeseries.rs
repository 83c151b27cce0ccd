use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a point in the equity curve: cash plus the marked-to-market position value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub cash: f64,
    pub position_value: f64,
    pub equity: f64,
}

impl EquityPoint {
    pub fn new(timestamp: DateTime<Utc>, cash: f64, position_value: f64) -> Self {
        EquityPoint {
            timestamp,
            cash,
            position_value,
            equity: cash + position_value,
        }
    }
}

//per-period percent-change returns of an equity series
//the first point has no defined return and is excluded
pub fn pct_change_returns(equity_values: &[f64]) -> Vec<f64> {
    if equity_values.len() < 2 {
        return vec![];
    }

    let mut returns = Vec::with_capacity(equity_values.len() - 1);
    for pair in equity_values.windows(2) {
        let ret = if pair[0] != 0.0 {
            (pair[1] - pair[0]) / pair[0]
        } else {
            0.0
        };
        returns.push(ret);
    }
    returns
}

//maximum drawdown as a negative fraction:
//min over t of equity[t] / running_max(equity[..=t]) - 1
//always <= 0; exactly 0 for a non-decreasing curve
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let drawdown = point.equity / peak - 1.0;
            if drawdown < worst {
                worst = drawdown;
            }
        }
    }

    worst
}
