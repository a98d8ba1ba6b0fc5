use std::fmt::Display;

use crate::{
    Indicator, Price,
    error::{Error, IndicatorKind, Result},
};

/// Savitzky–Golay smoothing filter, used as the MACD signal line.
///
/// Fits a polynomial of degree `polyorder` by least squares to each
/// `window`-sample neighbourhood and takes the fitted value at the centre.
/// Interior samples therefore reduce to a fixed convolution kernel; for a
/// 9-sample quadratic fit that kernel is
/// `[-21, 14, 39, 54, 59, 54, 39, 14, -21] / 231`.
///
/// The first and last `window / 2` samples have no centred neighbourhood.
/// They are evaluated from the polynomial fitted to the first (or last)
/// full window, at their own position in it.
///
/// Needs at least `window` samples.
///
/// # Example
///
/// ```
/// use ta_commentary::{Indicator, SavitzkyGolay};
///
/// let filter = SavitzkyGolay::new(5, 2).unwrap();
///
/// // A quadratic is reproduced exactly, edges included.
/// let input: Vec<f64> = (0..8).map(|x| f64::from(x * x)).collect();
/// let smoothed = filter.compute(&input);
///
/// for (s, x) in smoothed.iter().zip(&input) {
///     assert!((s - x).abs() < 1e-9);
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SavitzkyGolay {
    window: usize,
    polyorder: usize,
    /// Row `t`: weights giving the fitted value at position `t` of a window.
    coefficients: Vec<Vec<f64>>,
}

impl SavitzkyGolay {
    /// Creates a filter, precomputing its per-position weights.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when `window` is even or zero, or when
    /// `polyorder >= window`.
    pub fn new(window: usize, polyorder: usize) -> Result<Self> {
        if window.is_multiple_of(2) {
            return Err(Error::InvalidConfig(format!(
                "signal window must be odd, got {window}"
            )));
        }
        if polyorder >= window {
            return Err(Error::InvalidConfig(format!(
                "signal polynomial order {polyorder} must be less than window {window}"
            )));
        }

        let coefficients = fit_weights(window, polyorder).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "signal filter ({window}, {polyorder}) is numerically singular"
            ))
        })?;

        Ok(Self {
            window,
            polyorder,
            coefficients,
        })
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    #[must_use]
    pub fn polyorder(&self) -> usize {
        self.polyorder
    }

    /// Convolution kernel applied to interior samples.
    #[must_use]
    pub fn centre_kernel(&self) -> &[f64] {
        &self.coefficients[self.window / 2]
    }

    fn apply(weights: &[f64], samples: &[Price]) -> Price {
        weights.iter().zip(samples).map(|(w, x)| w * x).sum()
    }
}

impl Default for SavitzkyGolay {
    /// Nine-sample quadratic fit.
    fn default() -> Self {
        Self::new(9, 2).expect("9-sample quadratic filter is well-conditioned")
    }
}

impl Indicator for SavitzkyGolay {
    type Output = Price;

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Signal
    }

    fn required_bars(&self) -> usize {
        self.window
    }

    fn compute(&self, input: &[Price]) -> Vec<Price> {
        let n = input.len();
        let half = self.window / 2;

        if n < self.window {
            return input.to_vec();
        }

        let head = &input[..self.window];
        let tail = &input[n - self.window..];

        (0..n)
            .map(|i| {
                if i < half {
                    Self::apply(&self.coefficients[i], head)
                } else if i >= n - half {
                    Self::apply(&self.coefficients[i + self.window - n], tail)
                } else {
                    Self::apply(self.centre_kernel(), &input[i - half..=i + half])
                }
            })
            .collect()
    }
}

impl Display for SavitzkyGolay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SAVGOL({}, {})", self.window, self.polyorder)
    }
}

/// Least-squares weights for every evaluation position in the window.
///
/// With Vandermonde matrix `A` (rows: window positions centred on zero,
/// columns: powers `0..=polyorder`), the fitted value at position `x` is
/// `v(x)ᵀ (AᵀA)⁻¹ Aᵀ y`, so its weights are `A (AᵀA)⁻¹ v(x)`.
fn fit_weights(window: usize, polyorder: usize) -> Option<Vec<Vec<f64>>> {
    #[allow(clippy::cast_precision_loss)]
    let half = (window / 2) as f64;
    let terms = polyorder + 1;

    let powers = |x: f64| -> Vec<f64> {
        std::iter::successors(Some(1.0), |p| Some(p * x))
            .take(terms)
            .collect()
    };

    #[allow(clippy::cast_precision_loss)]
    let positions: Vec<f64> = (0..window).map(|j| j as f64 - half).collect();
    let vandermonde: Vec<Vec<f64>> = positions.iter().map(|&x| powers(x)).collect();

    let mut normal = vec![vec![0.0; terms]; terms];
    for row in &vandermonde {
        for (r, a) in row.iter().enumerate() {
            for (c, b) in row.iter().enumerate() {
                normal[r][c] += a * b;
            }
        }
    }

    positions
        .iter()
        .map(|&x| {
            let z = solve(normal.clone(), powers(x))?;
            Some(
                vandermonde
                    .iter()
                    .map(|row| row.iter().zip(&z).map(|(a, b)| a * b).sum::<f64>())
                    .collect(),
            )
        })
        .collect()
}

/// Solves `m × z = b` by Gaussian elimination with partial pivoting.
fn solve(mut m: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        m.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let pivot = m[col][col];
        if pivot.abs() < 1e-12 {
            return None;
        }

        for row in col + 1..n {
            let factor = m[row][col] / pivot;
            for k in col..n {
                m[row][k] -= factor * m[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut z = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| m[row][k] * z[k]).sum();
        z[row] = (b[row] - tail) / m[row][row];
    }

    Some(z)
}
