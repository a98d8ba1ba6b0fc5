use std::{fmt::Display, num::NonZero};

use crate::{Indicator, Price, error::IndicatorKind};

/// Bias-adjusted exponentially weighted mean over all history.
///
/// With `α = 2 / (span + 1)`, each value divides the decayed sum of inputs
/// by the decayed sum of weights:
///
/// ```text
/// y_t = Σ (1 − α)^i × x_{t−i} / Σ (1 − α)^i,  i = 0 ..= t
/// ```
///
/// Computed recursively as `y_t = y_{t−1} + (x_t − y_{t−1}) / W_t` with
/// `W_t = 1 + (1 − α) × W_{t−1}`, so the first value equals the first
/// input and a constant input yields exactly that constant.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub(crate) struct Ewm {
    span: usize,
}

impl Ewm {
    pub fn new(span: NonZero<usize>) -> Self {
        Self { span: span.get() }
    }

    pub fn compute(self, input: &[Price]) -> Vec<Price> {
        #[allow(clippy::cast_precision_loss)]
        let decay = 1.0 - 2.0 / (self.span + 1) as f64;

        let mut weight_sum = 0.0;
        let mut current = 0.0;

        input
            .iter()
            .map(|&price| {
                weight_sum = decay.mul_add(weight_sum, 1.0);
                current += (price - current) / weight_sum;
                current
            })
            .collect()
    }
}

/// Moving Average Convergence Divergence line.
///
/// `MACD = EWM(fast) − EWM(slow)` of the close, where both averages use the
/// whole history with recency bias (see the adjusted form on [`Ewm`]). The
/// average does not depend on the analysis period and is defined from the
/// first bar. Spans default to 12 and 26.
///
/// # Example
///
/// ```
/// use ta_commentary::{Indicator, Macd};
///
/// let macd = Macd::default();
/// let values = macd.compute(&[10.0, 11.0, 12.0, 13.0]);
///
/// // First bar: both averages equal the close.
/// assert_eq!(values[0], 0.0);
/// // Rising closes: the fast average leads.
/// assert!(values[3] > 0.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Macd {
    fast: Ewm,
    slow: Ewm,
}

impl Macd {
    #[must_use]
    pub fn new(fast: NonZero<usize>, slow: NonZero<usize>) -> Self {
        Self {
            fast: Ewm::new(fast),
            slow: Ewm::new(slow),
        }
    }

    #[must_use]
    pub fn fast_span(&self) -> usize {
        self.fast.span
    }

    #[must_use]
    pub fn slow_span(&self) -> usize {
        self.slow.span
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast: Ewm { span: 12 },
            slow: Ewm { span: 26 },
        }
    }
}

impl Indicator for Macd {
    type Output = Price;

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Macd
    }

    fn required_bars(&self) -> usize {
        1
    }

    fn compute(&self, input: &[Price]) -> Vec<Price> {
        let fast = self.fast.compute(input);
        let slow = self.slow.compute(input);

        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MACD({}, {})", self.fast.span, self.slow.span)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::assert_approx;

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    mod ewm {
        use super::*;

        /// Direct evaluation of the adjusted form.
        fn reference(input: &[f64], span: usize) -> Vec<f64> {
            #[allow(clippy::cast_precision_loss)]
            let decay = 1.0 - 2.0 / (span + 1) as f64;

            (0..input.len())
                .map(|t| {
                    let (mut num, mut den) = (0.0, 0.0);
                    for i in 0..=t {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                        let w = decay.powi(i as i32);
                        num += w * input[t - i];
                        den += w;
                    }
                    num / den
                })
                .collect()
        }

        #[test]
        fn first_value_is_first_input() {
            let values = Ewm::new(nz(12)).compute(&[42.0, 43.0]);
            assert_eq!(values[0], 42.0);
        }

        #[test]
        fn constant_input_is_exact() {
            let values = Ewm::new(nz(26)).compute(&[100.0; 50]);
            assert!(values.iter().all(|v| *v == 100.0));
        }

        #[test]
        fn matches_adjusted_definition() {
            let input = [5.0, 3.0, 8.0, 2.0, 9.0, 4.0, 7.0];
            let values = Ewm::new(nz(3)).compute(&input);

            for (actual, expected) in values.iter().zip(reference(&input, 3)) {
                assert_approx!(*actual, expected);
            }
        }

        #[test]
        fn second_value_for_span_three() {
            // α = 0.5: (x1 + 0.5 × x0) / 1.5
            let values = Ewm::new(nz(3)).compute(&[2.0, 8.0]);
            assert_approx!(values[1], 6.0);
        }

        #[test]
        fn span_one_is_identity() {
            let values = Ewm::new(nz(1)).compute(&[1.0, 5.0, 3.0]);
            assert_eq!(values, vec![1.0, 5.0, 3.0]);
        }
    }

    mod macd {
        use super::*;

        #[test]
        fn flat_series_is_zero() {
            let values = Macd::default().compute(&[100.0; 40]);
            assert!(values.iter().all(|v| *v == 0.0));
        }

        #[test]
        fn positive_in_uptrend() {
            let closes: Vec<f64> = (1..=60).map(f64::from).collect();
            let values = Macd::default().compute(&closes);
            assert!(values[1..].iter().all(|v| *v > 0.0));
        }

        #[test]
        fn negative_in_downtrend() {
            let closes: Vec<f64> = (1..=60).rev().map(f64::from).collect();
            let values = Macd::default().compute(&closes);
            assert!(values[1..].iter().all(|v| *v < 0.0));
        }

        #[test]
        fn defined_from_first_bar() {
            assert!(Macd::default().try_compute(&[10.0]).is_ok());
        }

        #[test]
        fn display_and_spans() {
            let macd = Macd::new(nz(5), nz(35));
            assert_eq!(macd.fast_span(), 5);
            assert_eq!(macd.slow_span(), 35);
            assert_eq!(macd.to_string(), "MACD(5, 35)");
            assert_eq!(Macd::default().to_string(), "MACD(12, 26)");
        }
    }
}
