use std::fmt::Display;

use thiserror::Error;

use crate::Timestamp;

/// Indicator whose prerequisites were not met.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Signal,
}

impl Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Rsi => "RSI",
            Self::Macd => "MACD",
            Self::Signal => "SIGNAL",
        };
        f.write_str(name)
    }
}

/// Why a row was rejected by [`OhlcvSeries::new`](crate::OhlcvSeries::new).
#[derive(PartialEq, Clone, Debug)]
pub enum SeriesViolation {
    Empty,
    NonIncreasingTime {
        previous: Timestamp,
        current: Timestamp,
    },
    InvalidPrice {
        field: &'static str,
        value: f64,
    },
    InvalidVolume(f64),
    HighLowMismatch,
}

impl Display for SeriesViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("series is empty"),
            Self::NonIncreasingTime { previous, current } => {
                write!(f, "open_time {current} does not follow {previous}")
            }
            Self::InvalidPrice { field, value } => {
                write!(f, "{field} must be positive and finite, got {value}")
            }
            Self::InvalidVolume(value) => {
                write!(f, "volume must be non-negative and finite, got {value}")
            }
            Self::HighLowMismatch => f.write_str("high/low do not bound open and close"),
        }
    }
}

/// Errors reported by the indicator engine.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("insufficient data for {indicator}: required {required} bars, got {available}")]
    InsufficientData {
        indicator: IndicatorKind,
        required: usize,
        available: usize,
    },

    #[error("invalid analysis period {0}: must be at least 1")]
    InvalidPeriod(usize),

    #[error("invalid series at row {index}: {reason}")]
    InvalidSeries {
        index: usize,
        reason: SeriesViolation,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
