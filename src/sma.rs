use std::{fmt::Display, num::NonZero};

use crate::{Indicator, Price, error::IndicatorKind, price_window::rolling_mean};

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* closes, where *n* is the
/// analysis period. The first `n - 1` entries are `None` because the
/// window is not yet full.
///
/// Uses a running sum for O(1) work per bar.
///
/// # Example
///
/// ```rust
/// use ta_commentary::{Indicator, Sma};
/// use std::num::NonZero;
///
/// let sma = Sma::new(NonZero::new(2).unwrap());
///
/// assert_eq!(
///     sma.compute(&[10.0, 20.0, 30.0]),
///     vec![None, Some(15.0), Some(25.0)],
/// );
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Sma {
    length: usize,
}

impl Sma {
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
        }
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Indicator for Sma {
    type Output = Option<Price>;

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Sma
    }

    fn required_bars(&self) -> usize {
        self.length
    }

    fn compute(&self, input: &[Price]) -> Vec<Option<Price>> {
        rolling_mean(input, self.length)
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({})", self.length)
    }
}
