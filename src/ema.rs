use std::{fmt::Display, num::NonZero};

use crate::{Indicator, Price, error::IndicatorKind};

/// Exponential Moving Average (EMA), kernel form.
///
/// Each value is a weighted mean of the trailing `length` closes. The
/// weights decay exponentially from the most recent bar back to the oldest
/// bar in the window and are normalized to sum to 1:
///
/// ```text
/// w_k   = exp(-1 + k / (length - 1)),  k = 0 (oldest) .. length - 1 (latest)
/// EMA_i = Σ w_k × close[i + 1 - length + k] / Σ w_k
/// ```
///
/// The first `length` entries are not computed from their own window;
/// they repeat the value at index `length` (flat-line padding), so the
/// column never has undefined entries. This needs at least `length + 1`
/// closes.
///
/// Unlike the recursive `α = 2 / (length + 1)` form, memory is limited to
/// the window: a bar older than `length` has no influence.
///
/// Values only depend on the current and earlier bars. This differs from
/// `np.convolve(close, w)[length - 1:]`, which puts the largest weight on
/// the oldest sample, reads later bars and tapers towards zero at the tail.
///
/// # Example
///
/// ```
/// use ta_commentary::{Ema, Indicator};
/// use std::num::NonZero;
///
/// let ema = Ema::new(NonZero::new(2).unwrap());
/// let values = ema.compute(&[10.0, 10.0, 10.0, 20.0]);
///
/// // Bars 0 and 1 are padded with the value of bar 2.
/// assert_eq!(values[0], values[2]);
/// assert_eq!(values[1], values[2]);
///
/// // The latest bar is weighted more than its predecessor.
/// assert!(values[3] > 15.0 && values[3] < 20.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Ema {
    length: usize,
}

impl Ema {
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

    /// Normalized weights, oldest first.
    #[must_use]
    pub fn kernel(&self) -> Vec<f64> {
        let weights: Vec<f64> = if self.length == 1 {
            vec![1.0]
        } else {
            #[allow(clippy::cast_precision_loss)]
            let step = 1.0 / (self.length - 1) as f64;

            #[allow(clippy::cast_precision_loss)]
            (0..self.length)
                .map(|k| (-1.0 + k as f64 * step).exp())
                .collect()
        };

        let total: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    }
}

impl Indicator for Ema {
    type Output = Price;

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema
    }

    fn required_bars(&self) -> usize {
        self.length.saturating_add(1)
    }

    fn compute(&self, input: &[Price]) -> Vec<Price> {
        let mut values = vec![0.0; input.len()];
        if input.len() < self.length {
            return values;
        }

        let kernel = self.kernel();

        for (i, window) in input.windows(self.length).enumerate() {
            values[i + self.length - 1] = window
                .iter()
                .zip(&kernel)
                .map(|(price, weight)| price * weight)
                .sum();
        }

        if let Some(&fill) = values.get(self.length) {
            values[..self.length].fill(fill);
        }

        values
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({})", self.length)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{error::Error, test_util::assert_approx};

    fn ema(length: usize) -> Ema {
        Ema::new(NonZero::new(length).unwrap())
    }

    mod kernel {
        use super::*;

        #[test]
        fn sums_to_one() {
            for length in [1, 2, 3, 20, 90] {
                let total: f64 = ema(length).kernel().iter().sum();
                assert_approx!(total, 1.0);
            }
        }

        #[test]
        fn increases_towards_latest() {
            let kernel = ema(5).kernel();
            assert!(kernel.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn spans_one_e_fold() {
            let kernel = ema(10).kernel();
            assert_approx!(kernel[9] / kernel[0], std::f64::consts::E);
        }

        #[test]
        fn length_one_is_identity() {
            assert_eq!(ema(1).kernel(), vec![1.0]);
        }
    }

    mod values {
        use super::*;

        #[test]
        fn weighted_mean_of_window() {
            let closes = [1.0, 2.0, 4.0, 8.0, 16.0];
            let kernel = ema(3).kernel();
            let values = ema(3).compute(&closes);

            let expected = kernel[0] * 4.0 + kernel[1] * 8.0 + kernel[2] * 16.0;
            assert_approx!(values[4], expected);
        }

        #[test]
        fn leading_entries_repeat_value_at_length() {
            let values = ema(3).compute(&[1.0, 2.0, 4.0, 8.0, 16.0]);
            assert_eq!(values[0], values[3]);
            assert_eq!(values[1], values[3]);
            assert_eq!(values[2], values[3]);
            assert_ne!(values[3], values[4]);
        }

        #[test]
        fn length_one_tracks_close_after_padding() {
            let values = ema(1).compute(&[5.0, 6.0, 7.0]);
            assert_eq!(values, vec![6.0, 6.0, 7.0]);
        }

        #[test]
        fn lags_a_rising_series() {
            let closes: Vec<f64> = (1..=30).map(f64::from).collect();
            let values = ema(10).compute(&closes);
            assert!(values[29] < 30.0);
            assert!(values[29] > 25.5);
        }

        #[test]
        fn aligned_to_input() {
            assert_eq!(ema(4).compute(&[1.0; 12]).len(), 12);
        }
    }

    mod requirements {
        use super::*;

        #[test]
        fn needs_one_bar_past_window() {
            assert_eq!(
                ema(3).try_compute(&[1.0, 2.0, 3.0]),
                Err(Error::InsufficientData {
                    indicator: IndicatorKind::Ema,
                    required: 4,
                    available: 3,
                })
            );
            assert!(ema(3).try_compute(&[1.0, 2.0, 3.0, 4.0]).is_ok());
        }

        #[test]
        fn huge_length_reports_insufficient_data() {
            let indicator = Ema::new(NonZero::<usize>::MAX);
            let closes = [1.0, 2.0];

            assert_eq!(indicator.compute(&closes).len(), 2);
            assert_eq!(
                indicator.try_compute(&closes),
                Err(Error::InsufficientData {
                    indicator: IndicatorKind::Ema,
                    required: usize::MAX,
                    available: 2,
                })
            );
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(ema(50).to_string(), "EMA(50)");
        }
    }
}
