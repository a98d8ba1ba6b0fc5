use serde::Serialize;
use tracing::warn;

use crate::{
    Bar, Ohlcv, Price,
    error::{Error, Result, SeriesViolation},
};

/// A validated, chronologically ordered OHLCV series.
///
/// Guarantees, checked once at construction:
///
/// - at least one bar;
/// - strictly increasing `open_time`;
/// - open, high, low, close positive and finite;
/// - volume non-negative and finite;
/// - `low <= min(open, close)` and `high >= max(open, close)`.
///
/// # Example
///
/// ```
/// use ta_commentary::{Bar, OhlcvSeries};
///
/// let series = OhlcvSeries::new(vec![
///     Bar::new(1, 10.0, 11.0, 9.0, 10.5),
///     Bar::new(2, 10.5, 12.0, 10.0, 11.5),
/// ])
/// .unwrap();
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.latest().close, 11.5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OhlcvSeries {
    bars: Vec<Bar>,
}

impl OhlcvSeries {
    /// Validates and wraps `bars`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSeries`] naming the first offending row.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(Error::InvalidSeries {
                index: 0,
                reason: SeriesViolation::Empty,
            });
        }

        for (index, bar) in bars.iter().enumerate() {
            let previous = index.checked_sub(1).map(|i| &bars[i]);

            if let Err(reason) = check_bar(bar, previous) {
                warn!(index, %reason, "rejecting OHLCV series");
                return Err(Error::InvalidSeries { index, reason });
            }
        }

        Ok(Self { bars })
    }

    /// Copies foreign rows into an owned, validated series.
    ///
    /// # Errors
    ///
    /// Same as [`OhlcvSeries::new`].
    pub fn from_rows<T: Ohlcv>(rows: &[T]) -> Result<Self> {
        Self::new(rows.iter().map(Bar::from_ohlcv).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always `false`: construction rejects empty input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The most recent bar.
    #[must_use]
    pub fn latest(&self) -> &Bar {
        self.bars
            .last()
            .expect("OhlcvSeries invariant violation: series is never empty")
    }

    /// Close prices in chronological order.
    #[must_use]
    pub fn closes(&self) -> Vec<Price> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}

fn check_bar(bar: &Bar, previous: Option<&Bar>) -> std::result::Result<(), SeriesViolation> {
    if let Some(previous) = previous
        && previous.open_time >= bar.open_time
    {
        return Err(SeriesViolation::NonIncreasingTime {
            previous: previous.open_time,
            current: bar.open_time,
        });
    }

    for (field, value) in [
        ("open", bar.open),
        ("high", bar.high),
        ("low", bar.low),
        ("close", bar.close),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(SeriesViolation::InvalidPrice { field, value });
        }
    }

    if !bar.volume.is_finite() || bar.volume < 0.0 {
        return Err(SeriesViolation::InvalidVolume(bar.volume));
    }

    if bar.low > bar.open.min(bar.close) || bar.high < bar.open.max(bar.close) {
        return Err(SeriesViolation::HighLowMismatch);
    }

    Ok(())
}
