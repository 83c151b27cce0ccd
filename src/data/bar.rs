use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataIntegrityError {
    #[error("empty price series")]
    EmptySeries,
    #[error("timestamps not strictly increasing at index {index}")]
    NonMonotonicTimestamp { index: usize },
    #[error("non-finite {field} at index {index}")]
    NonFiniteField { index: usize, field: &'static str },
    #[error("non-positive {field} ({value}) at index {index}")]
    NonPositivePrice {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("negative volume ({value}) at index {index}")]
    NegativeVolume { index: usize, value: f64 },
    #[error("signal count ({signals}) does not match bar count ({bars})")]
    SignalLengthMismatch { bars: usize, signals: usize },
}

//represents a single ohlcv bar (candlestick) of market data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    //returns the typical price (HLC/3)
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    //returns the range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

//validates a price series once, before any simulation touches it:
//strictly increasing timestamps, finite positive prices, non-negative volume
pub fn validate_series(bars: &[Bar]) -> Result<(), DataIntegrityError> {
    if bars.is_empty() {
        return Err(DataIntegrityError::EmptySeries);
    }

    for (index, bar) in bars.iter().enumerate() {
        for (field, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() {
                return Err(DataIntegrityError::NonFiniteField { index, field });
            }
            if value <= 0.0 {
                return Err(DataIntegrityError::NonPositivePrice {
                    index,
                    field,
                    value,
                });
            }
        }

        if !bar.volume.is_finite() {
            return Err(DataIntegrityError::NonFiniteField {
                index,
                field: "volume",
            });
        }
        if bar.volume < 0.0 {
            return Err(DataIntegrityError::NegativeVolume {
                index,
                value: bar.volume,
            });
        }

        if index > 0 && bars[index - 1].timestamp >= bar.timestamp {
            return Err(DataIntegrityError::NonMonotonicTimestamp { index });
        }
    }

    Ok(())
}
