use crate::{
    Price,
    error::{Error, IndicatorKind, Result},
};

use std::fmt::{Debug, Display};

/// A batch technical indicator over a price column.
///
/// Indicators are cheap parameter holders: [`compute`](Indicator::compute)
/// maps an input column to an output column of the same length. Entries
/// that cannot be defined yet (window not full) are expressed through the
/// `Output` type, usually `Option<Price>`.
///
/// # Example
///
/// ```
/// use ta_commentary::{Indicator, Sma};
/// use std::num::NonZero;
///
/// let sma = Sma::new(NonZero::new(3).unwrap());
/// let closes = [10.0, 20.0, 30.0, 40.0];
///
/// let values = sma.try_compute(&closes).unwrap();
/// assert_eq!(values, vec![None, None, Some(20.0), Some(30.0)]);
///
/// assert!(sma.try_compute(&closes[..2]).is_err());
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Computed value for a single bar.
    type Output: Send + Sync + Debug;

    /// Which indicator this is, for error reporting.
    fn kind(&self) -> IndicatorKind;

    /// Minimum input length for the latest entry to be defined.
    fn required_bars(&self) -> usize;

    /// Computes the output column, aligned 1:1 with `input`.
    ///
    /// Callers must ensure `input.len() >= self.required_bars()`; use
    /// [`try_compute`](Indicator::try_compute) to have that checked. Shorter
    /// input never panics but the column contents are unspecified.
    fn compute(&self, input: &[Price]) -> Vec<Self::Output>;

    /// Checks the input length, then computes.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] when `input` is shorter than
    /// [`required_bars`](Indicator::required_bars).
    fn try_compute(&self, input: &[Price]) -> Result<Vec<Self::Output>> {
        let required = self.required_bars();

        if input.len() < required {
            return Err(Error::InsufficientData {
                indicator: self.kind(),
                required,
                available: input.len(),
            });
        }

        Ok(self.compute(input))
    }
}
