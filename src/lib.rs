//! Technical analysis indicators and rule-based commentary for Rust.
//!
//! An [`OhlcvSeries`] is a validated, time-ordered run of [`Bar`]s. The
//! [`IndicatorEngine`] derives SMA, EMA, RSI, MACD, a smoothed signal line
//! and the MACD histogram over the whole series, aligned bar for bar. The
//! [`CommentaryGenerator`] reads the latest bar of the result and emits
//! plain-language [`Observation`]s.
//!
//! Single indicators implement [`Indicator`] and can be used on their own
//! over any slice of prices.
//!
//! ```rust
//! use ta_commentary::{Bar, IndicatorEngine, OhlcvSeries};
//!
//! let bars = (1..=60u32)
//!     .map(|i| {
//!         let close = 100.0 + f64::from(i);
//!         Bar::new(u64::from(i), close - 0.5, close + 1.0, close - 1.0, close)
//!     })
//!     .collect();
//!
//! let series = OhlcvSeries::new(bars).unwrap();
//! let engine = IndicatorEngine::with_period(series, 20).unwrap();
//!
//! for line in engine.commentary().messages() {
//!     println!("{line}");
//! }
//! ```

mod commentary;
mod config;
mod ema;
mod engine;
mod error;
mod indicator;
pub mod loader;
mod macd;
mod ohlcv;
mod price_window;
mod rsi;
mod savgol;
mod series;
mod sma;

pub use crate::error::{Error, IndicatorKind, Result, SeriesViolation};
pub use crate::indicator::Indicator;
pub use crate::loader::{LoadError, load_csv, read_csv};
pub use crate::ohlcv::{Bar, Ohlcv, Price, Timestamp};
pub use crate::series::OhlcvSeries;

pub use crate::ema::Ema;
pub use crate::macd::Macd;
pub use crate::rsi::{Rsi, RsiValue};
pub use crate::savgol::SavitzkyGolay;
pub use crate::sma::Sma;

pub use crate::config::{
    CommentaryConfig, CommentaryConfigBuilder, EngineConfig, EngineConfigBuilder,
};
pub use crate::engine::{EnrichedRow, EnrichedSeries, IndicatorEngine, IndicatorSet, LatestReading};

pub use crate::commentary::{Commentary, CommentaryGenerator, Observation, RuleCategory};

#[cfg(test)]
mod test_util;
