use std::{fmt::Display, num::NonZero};

use serde::Serialize;

use crate::{Indicator, Price, error::IndicatorKind, price_window::PriceWindow};

/// One RSI reading together with the averages it was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RsiValue {
    value: f64,
    avg_gain: f64,
    avg_loss: f64,
}

impl RsiValue {
    /// Oscillator value in `[0, 100]`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Mean gain over the window.
    #[must_use]
    pub fn avg_gain(&self) -> f64 {
        self.avg_gain
    }

    /// Mean loss magnitude over the window.
    #[must_use]
    pub fn avg_loss(&self) -> f64 {
        self.avg_loss
    }

    /// `true` when the window saw neither gains nor losses.
    ///
    /// The value is still reported as 100 in that case.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.avg_gain == 0.0 && self.avg_loss == 0.0
    }

    /// Reading from mean gain and mean loss magnitude; 100 when there
    /// were no losses.
    #[must_use]
    pub fn from_averages(avg_gain: f64, avg_loss: f64) -> Self {
        let value = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };

        Self {
            value,
            avg_gain,
            avg_loss,
        }
    }
}

impl Display for RsiValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}

/// Relative Strength Index (RSI) over rolling means.
///
/// Close-to-close changes are split into gains and losses (as positive
/// magnitudes). Both are averaged with a trailing simple mean over `length`
/// changes:
///
/// ```text
/// RS  = mean(gains) / mean(losses)
/// RSI = 100 − 100 / (1 + RS)
/// ```
///
/// The first bar has no change, so the first `length` entries are `None`
/// and the first value lands on bar `length`. A window without losses
/// reads exactly 100.
///
/// # Example
///
/// ```
/// use ta_commentary::{Indicator, Rsi};
/// use std::num::NonZero;
///
/// let rsi = Rsi::new(NonZero::new(3).unwrap());
///
/// // changes: +2, −1, +2 → mean gain 4/3, mean loss 1/3 → RSI 80
/// let values = rsi.compute(&[10.0, 12.0, 11.0, 13.0]);
///
/// assert!(values[2].is_none());
/// assert!((values[3].unwrap().value() - 80.0).abs() < 1e-9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Rsi {
    length: usize,
}

impl Rsi {
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

    fn gain_and_loss(prev: Price, price: Price) -> (f64, f64) {
        let change = price - prev;

        if change > 0.0 {
            (change, 0.0)
        } else if change < 0.0 {
            (0.0, -change)
        } else {
            (0.0, 0.0)
        }
    }
}

impl Indicator for Rsi {
    type Output = Option<RsiValue>;

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi
    }

    fn required_bars(&self) -> usize {
        self.length.saturating_add(1)
    }

    fn compute(&self, input: &[Price]) -> Vec<Option<RsiValue>> {
        let mut gains = PriceWindow::new(self.length, input.len());
        let mut losses = PriceWindow::new(self.length, input.len());

        let mut values = Vec::with_capacity(input.len());
        if input.is_empty() {
            return values;
        }
        values.push(None);

        for pair in input.windows(2) {
            let (gain, loss) = Self::gain_and_loss(pair[0], pair[1]);
            gains.push(gain);
            losses.push(loss);

            values.push(
                gains
                    .mean()
                    .zip(losses.mean())
                    .map(|(avg_gain, avg_loss)| RsiValue::from_averages(avg_gain, avg_loss)),
            );
        }

        values
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({})", self.length)
    }
}
