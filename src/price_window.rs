use crate::Price;
use std::collections::VecDeque;

/// Fixed-size trailing window with a running sum.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow {
    size: usize,
    window: VecDeque<Price>,
    /// Maintained incrementally via add/subtract. May accumulate FP rounding
    /// drift over very long runs, negligible for typical window sizes.
    sum: Price,
    /// Count of non-zero values in the window. When zero the mean is
    /// reported as exactly `0.0`, free of the running sum's drift.
    nonzero: usize,
}

impl PriceWindow {
    /// Window of `size` values, preallocating for at most `expected` pushes.
    pub fn new(size: usize, expected: usize) -> Self {
        debug_assert!(size > 0, "PriceWindow size must be positive");

        Self {
            size,
            window: VecDeque::with_capacity(size.min(expected)),
            sum: 0.0,
            nonzero: 0,
        }
    }

    /// Pushes `value`, evicting the oldest entry once the window is full.
    #[inline]
    pub fn push(&mut self, value: Price) {
        if self.is_ready()
            && let Some(old) = self.window.pop_front()
        {
            self.sum -= old;
            if old != 0.0 {
                self.nonzero -= 1;
            }
        }

        self.window.push_back(value);
        self.sum += value;
        if value != 0.0 {
            self.nonzero += 1;
        }
    }

    /// Window mean, `None` until `size` values were pushed.
    #[inline]
    pub fn mean(&self) -> Option<Price> {
        if !self.is_ready() {
            return None;
        }
        if self.nonzero == 0 {
            return Some(0.0);
        }

        #[allow(clippy::cast_precision_loss)]
        Some(self.sum / self.size as f64)
    }

    #[inline]
    fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }
}

/// Trailing rolling mean of `values`, aligned to the input.
///
/// Entry `i` is the mean of `values[i + 1 - size ..= i]`, or `None` for the
/// first `size - 1` entries.
pub(crate) fn rolling_mean(values: &[Price], size: usize) -> Vec<Option<Price>> {
    let mut window = PriceWindow::new(size, values.len());

    values
        .iter()
        .map(|&value| {
            window.push(value);
            window.mean()
        })
        .collect()
}
