// src/test_util.rs

use crate::{Bar, OhlcvSeries, Price};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `64 * f64::EPSILON` (absolute near zero).
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e): (f64, f64) = ($actual, $expected);
        let tolerance = e.abs().max(1.0) * 64.0 * f64::EPSILON;
        assert!(
            (a - e).abs() <= tolerance,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Convenience: bar with just a close price and timestamp (OHLC all equal to close).
pub fn bar(close: Price, time: u64) -> Bar {
    Bar::new(time, close, close, close, close)
}

/// Bar that opened at `open` and closed at `close`, with high/low bounding both.
pub fn candle(open: Price, close: Price, time: u64) -> Bar {
    Bar::new(time, open, open.max(close), open.min(close), close)
}

/// Series of flat bars, one per close, timestamps starting at 1.
pub fn series_of(closes: &[Price]) -> OhlcvSeries {
    let bars = closes
        .iter()
        .zip(1..)
        .map(|(&close, time)| bar(close, time))
        .collect();
    OhlcvSeries::new(bars).expect("test closes must form a valid series")
}

/// `count` closes rising by 1.0 from `start`.
pub fn rising(start: Price, count: usize) -> Vec<Price> {
    #[allow(clippy::cast_precision_loss)]
    (0..count).map(|i| start + i as f64).collect()
}
