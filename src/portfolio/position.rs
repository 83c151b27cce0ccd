use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//open-position state threaded through the simulation fold
//long-only: the engine's state machine is Flat --Buy--> Long --Sell--> Flat
#[derive(Debug, Clone, PartialEq)]
pub enum PositionState {
    Flat,
    Long {
        qty: u64,
        entry_price: f64,
        opened_at: DateTime<Utc>,
    },
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn is_long(&self) -> bool {
        matches!(self, PositionState::Long { .. })
    }

    //mark-to-market value of the position at the given price
    pub fn market_value(&self, price: f64) -> f64 {
        match self {
            PositionState::Flat => 0.0,
            PositionState::Long { qty, .. } => *qty as f64 * price,
        }
    }

    //unrealized pnl of the position at the given price
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self {
            PositionState::Flat => 0.0,
            PositionState::Long {
                qty, entry_price, ..
            } => (price - entry_price) * *qty as f64,
        }
    }
}

//a completed round trip, appended when a position closes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub qty: u64,
    pub pnl: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    //simple return of the round trip relative to entry cost
    pub fn trade_return(&self) -> f64 {
        self.exit_price / self.entry_price - 1.0
    }
}
