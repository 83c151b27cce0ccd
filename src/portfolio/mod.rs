pub mod position;

pub use position::{PositionState, Trade};
