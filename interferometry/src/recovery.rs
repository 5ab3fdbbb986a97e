//! Recovery of the lens radius from measured ring diameters.
//!
//! Two estimators are provided.
//!
//! [`recover_radius`] regresses D² on the effective ring order. The slope of
//! that line is 4·λ·R, so R = slope / (4·λ). The regression also yields R²,
//! the residual standard error and a 95% confidence half-width on R using the
//! Student-t critical value for n − 2 degrees of freedom. A clean contact
//! gives an intercept near zero; dust or pressure at the contact shifts the
//! intercept but leaves the slope, and so the radius, unaffected.
//!
//! [`calculate_radius_by_physics`] inverts the ring formula for every ring
//! separately, R_i = D_i² / (4·λ·x_i), rejects values more than
//! [`MAD_REJECTION_K`] median absolute deviations from the median, and
//! averages the rest. It needs no fit and tolerates single misread rings,
//! but unlike the regression it is biased by a non-zero intercept.

use fringe_math::{
    critical_95, fit_linear, mad_filter, median_absolute_deviation, regression_stats,
};
use serde::{Deserialize, Serialize};

use crate::error::{OpticsError, Result};
use crate::params::{checked_wavelength_nm, FitResult, MeasurementSample};
use crate::units::{Length, LengthExt};

/// Minimum number of valid rings for either estimator
pub const MIN_SAMPLES: usize = 3;

/// Per-ring radii further than this many MADs from the median are rejected
pub const MAD_REJECTION_K: f64 = 3.0;

/// Outcome of the per-ring estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobustRadiusEstimate {
    /// Mean of the per-ring radii that survived rejection
    pub radius_mm: f64,
    pub median_mm: f64,
    pub mad_mm: f64,
    pub n_kept: usize,
    /// Invalid samples plus rejected outliers
    pub n_rejected: usize,
}

fn is_usable(sample: &MeasurementSample) -> bool {
    let d2 = sample.diameter_squared_mm2;
    d2.is_finite() && d2 > 0.0 && sample.effective_order() > 0.0
}

fn wavelength_mm(wavelength: Length) -> Result<f64> {
    checked_wavelength_nm(wavelength.as_nanometers())?;
    Ok(wavelength.as_millimeters())
}

/// Least-squares radius from D² against effective order.
///
/// Samples with a non-finite or non-positive D², or a non-positive
/// effective order, are dropped and counted in `n_rejected`.
///
/// # Errors
/// * `OpticsError::InvalidParameter` - the wavelength is outside 380-780 nm
/// * `OpticsError::InsufficientData` - fewer than 3 samples remain
/// * `OpticsError::DegenerateFit` - every sample has the same effective order
/// * `OpticsError::NonPhysicalRadius` - the fitted slope is not positive
///
/// # Examples
/// ```rust
/// use interferometry::recovery::recover_radius;
/// use interferometry::units::{Length, LengthExt};
/// use interferometry::{MeasurementSample, RingKind};
///
/// // Dark rings of a 100 mm lens under 589 nm light
/// let samples: Vec<_> = (1..=5)
///     .map(|m| MeasurementSample::new(m, RingKind::Dark, 0.2356 * m as f64))
///     .collect();
///
/// let fit = recover_radius(&samples, Length::from_nanometers(589.0)).unwrap();
/// assert!((fit.radius_mm - 100.0).abs() < 1e-9);
/// ```
pub fn recover_radius(samples: &[MeasurementSample], wavelength: Length) -> Result<FitResult> {
    let lambda_mm = wavelength_mm(wavelength)?;

    let points: Vec<(f64, f64)> = samples
        .iter()
        .filter(|s| is_usable(s))
        .map(|s| (s.effective_order(), s.diameter_squared_mm2))
        .collect();
    let n_rejected = samples.len() - points.len();
    if n_rejected > 0 {
        log::debug!(
            "Dropped {n_rejected} of {} samples with unusable order or diameter",
            samples.len()
        );
    }

    if points.len() < MIN_SAMPLES {
        return Err(OpticsError::InsufficientData {
            needed: MIN_SAMPLES,
            got: points.len(),
        });
    }

    let fit = fit_linear(&points)?;
    let stats = regression_stats(&points, &fit)?;

    if !(fit.slope > 0.0) || !fit.slope.is_finite() {
        return Err(OpticsError::NonPhysicalRadius { slope: fit.slope });
    }

    let four_lambda = 4.0 * lambda_mm;
    let radius_mm = fit.slope / four_lambda;
    let t_critical = critical_95(points.len() - 2);
    let radius_uncertainty_mm = t_critical * stats.slope_standard_error / four_lambda;

    log::debug!(
        "Fitted D² = {:.6}·x + {:.6} over {} rings: \
         R = {radius_mm:.3} ± {radius_uncertainty_mm:.3} mm, r² = {:.6}",
        fit.slope,
        fit.intercept,
        points.len(),
        stats.r_squared
    );

    Ok(FitResult {
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: stats.r_squared,
        standard_error: stats.standard_error,
        slope_standard_error: stats.slope_standard_error,
        radius_mm,
        radius_uncertainty_mm,
        t_critical,
        n_used: points.len(),
        n_rejected,
        relative_error_pct: None,
    })
}

/// Mean of the per-ring radii R_i = D_i² / (4·λ·x_i) after MAD rejection.
///
/// # Errors
/// * `OpticsError::InvalidParameter` - the wavelength is outside 380-780 nm
/// * `OpticsError::InsufficientData` - fewer than 3 usable rings
pub fn calculate_radius_by_physics(
    wavelength: Length,
    samples: &[MeasurementSample],
) -> Result<RobustRadiusEstimate> {
    let lambda_mm = wavelength_mm(wavelength)?;

    let radii: Vec<f64> = samples
        .iter()
        .filter(|s| is_usable(s))
        .map(|s| s.diameter_squared_mm2 / (4.0 * lambda_mm * s.effective_order()))
        .filter(|r| r.is_finite() && *r > 0.0)
        .collect();

    if radii.len() < MIN_SAMPLES {
        return Err(OpticsError::InsufficientData {
            needed: MIN_SAMPLES,
            got: radii.len(),
        });
    }

    let (median_mm, mad_mm) = median_absolute_deviation(&radii)?;
    let kept = mad_filter(&radii, MAD_REJECTION_K)?;
    if kept.is_empty() {
        return Err(OpticsError::InsufficientData {
            needed: 1,
            got: 0,
        });
    }

    let radius_mm = kept.iter().sum::<f64>() / kept.len() as f64;
    log::debug!(
        "Per-ring radius: {} kept of {}, mean {radius_mm:.3} mm, median {median_mm:.3} mm",
        kept.len(),
        samples.len()
    );

    Ok(RobustRadiusEstimate {
        radius_mm,
        median_mm,
        mad_mm,
        n_kept: kept.len(),
        n_rejected: samples.len() - kept.len(),
    })
}

/// `|measured − truth| / truth` in percent.
///
/// `None` when `truth` is not finite and positive or `measured` is not
/// finite.
pub fn relative_error_pct(measured: f64, truth: f64) -> Option<f64> {
    if !measured.is_finite() || !truth.is_finite() || truth <= 0.0 {
        return None;
    }
    Some((measured - truth).abs() / truth * 100.0)
}
