//! Ordinary least-squares line fitting and fit-quality statistics.
//!
//! The fit is the closed-form solution of `y = slope * x + intercept`:
//!
//! ```text
//! slope     = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)
//! intercept = (Σy − slope·Σx) / n
//! ```
//!
//! The sums are accumulated about the sample means, which is algebraically
//! identical to the raw-sum form but does not lose precision when the x
//! values sit far from the origin.
//!
//! Fitting never substitutes placeholder data. Too few points, zero
//! x-variance and non-finite inputs are reported as [`FitError`] so that the
//! caller decides what to show instead.

use thiserror::Error;

/// Errors that can occur while fitting a line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Degenerate fit: x values have zero variance")]
    DegenerateFit,

    #[error("Non-finite input at point {index}: ({x}, {y})")]
    NonFinite { index: usize, x: f64, y: f64 },
}

/// Slope and intercept of a least-squares line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of points the line was fitted to
    pub n: usize,
}

impl LinearFit {
    /// Evaluate the line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Sample the fitted line from `start` to `end` (inclusive) every `step`.
    ///
    /// Returns an empty vector for a non-positive or non-finite step.
    pub fn sample_line(&self, start: f64, end: f64, step: f64) -> Vec<(f64, f64)> {
        if !(step > 0.0) || !step.is_finite() || end < start {
            return Vec::new();
        }

        let count = ((end - start) / step + 1e-9).floor() as usize;
        (0..=count)
            .map(|i| {
                let x = start + i as f64 * step;
                (x, self.predict(x))
            })
            .collect()
    }
}

/// Goodness-of-fit statistics for a [`LinearFit`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionStats {
    /// Coefficient of determination, 1 − SS_res / SS_tot
    pub r_squared: f64,
    /// Residual standard error, sqrt(SS_res / (n − 2))
    pub standard_error: f64,
    /// Standard error of the slope, SE / sqrt(Sxx)
    pub slope_standard_error: f64,
    /// Residual sum of squares
    pub ss_res: f64,
    /// Total sum of squares about the mean of y
    pub ss_tot: f64,
    /// Observed minus predicted, in input order
    pub residuals: Vec<f64>,
}

struct Moments {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    sxy: f64,
}

fn moments(points: &[(f64, f64)]) -> Result<Moments, FitError> {
    for (index, &(x, y)) in points.iter().enumerate() {
        if !x.is_finite() || !y.is_finite() {
            return Err(FitError::NonFinite { index, x, y });
        }
    }

    let n = points.len();
    let n_f = n as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n_f;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n_f;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    Ok(Moments {
        n,
        mean_x,
        mean_y,
        sxx,
        sxy,
    })
}

/// Fit `y = slope * x + intercept` by ordinary least squares.
///
/// # Arguments
/// * `points` - `(x, y)` pairs, at least two with distinct x
///
/// # Errors
/// * `FitError::InsufficientData` - fewer than 2 points
/// * `FitError::DegenerateFit` - every x is identical
/// * `FitError::NonFinite` - a coordinate is NaN or infinite
///
/// # Examples
/// ```rust
/// use fringe_math::fit_linear;
///
/// let fit = fit_linear(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn fit_linear(points: &[(f64, f64)]) -> Result<LinearFit, FitError> {
    if points.len() < 2 {
        return Err(FitError::InsufficientData {
            needed: 2,
            got: points.len(),
        });
    }

    let m = moments(points)?;
    if !(m.sxx > 0.0) {
        return Err(FitError::DegenerateFit);
    }

    let slope = m.sxy / m.sxx;
    let intercept = m.mean_y - slope * m.mean_x;

    Ok(LinearFit {
        slope,
        intercept,
        n: m.n,
    })
}

/// Compute R², residual standard error and slope standard error of `fit`
/// over `points`.
///
/// The residual standard error has `n − 2` degrees of freedom, so at least
/// three points are required.
///
/// A dataset whose y values are all equal has SS_tot = 0; R² is then
/// reported as 1 when the line passes through every point and 0 otherwise.
pub fn regression_stats(
    points: &[(f64, f64)],
    fit: &LinearFit,
) -> Result<RegressionStats, FitError> {
    if points.len() < 3 {
        return Err(FitError::InsufficientData {
            needed: 3,
            got: points.len(),
        });
    }

    let m = moments(points)?;
    if !(m.sxx > 0.0) {
        return Err(FitError::DegenerateFit);
    }

    let residuals: Vec<f64> = points.iter().map(|&(x, y)| y - fit.predict(x)).collect();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let ss_tot: f64 = points.iter().map(|&(_, y)| (y - m.mean_y).powi(2)).sum();

    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    let standard_error = (ss_res / (m.n as f64 - 2.0)).sqrt();
    let slope_standard_error = standard_error / m.sxx.sqrt();

    Ok(RegressionStats {
        r_squared,
        standard_error,
        slope_standard_error,
        ss_res,
        ss_tot,
        residuals,
    })
}
