use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// Must be strictly increasing across the rows of an
/// [`OhlcvSeries`](crate::OhlcvSeries).
pub type Timestamp = u64;

/// OHLCV row data accepted by [`OhlcvSeries`](crate::OhlcvSeries).
///
/// Implement this on your own kline/candle type and pass a slice of it to
/// [`OhlcvSeries::from_rows`](crate::OhlcvSeries::from_rows); rows are
/// copied into owned [`Bar`]s once, at the boundary.
///
/// # Example
///
/// ```
/// use ta_commentary::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64, v: f64,
///     ts: u64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn volume(&self) -> f64 { self.v }
///     fn open_time(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Traded volume during the bar.
    fn volume(&self) -> f64;

    /// Bar open timestamp or sequence number.
    fn open_time(&self) -> Timestamp;
}

/// One owned OHLCV row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open_time: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: f64,
}

impl Bar {
    /// Creates a bar with zero volume at `open_time`.
    #[must_use]
    pub fn new(open_time: Timestamp, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    /// Sets the traded volume.
    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Copies any [`Ohlcv`] row into an owned bar.
    #[must_use]
    pub fn from_ohlcv(row: &impl Ohlcv) -> Self {
        Self {
            open_time: row.open_time(),
            open: row.open(),
            high: row.high(),
            low: row.low(),
            close: row.close(),
            volume: row.volume(),
        }
    }
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}
