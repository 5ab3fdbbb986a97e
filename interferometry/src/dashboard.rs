//! Statistics for the exploratory experiment dashboard.
//!
//! The dashboard lets a student look for relationships between the
//! quantities of the experiment before taking measurements. Each
//! [`DashboardParameter`] has a synthetic distribution over the range used
//! in the laboratory, and [`correlation_matrix`] correlates seeded samples
//! of any set of them.
//!
//! [`ErrorSource`] and [`error_impact`] give the sensitivity of the recovered
//! radius to the usual systematic errors of the experiment.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::f64::consts::PI;
use std::fmt;

use fringe_math::{correlate, CorrelationMethod, StatsError};

use crate::error::Result;

/// Wavelength used to derive the synthetic ring diameters, mm
const DIAMETER_WAVELENGTH_MM: f64 = 5.89e-4;

/// Quantities available on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardParameter {
    /// Lens radius, uniform on [100, 300] mm
    Radius,
    /// Illumination wavelength, uniform on [400, 700] nm
    Wavelength,
    /// Number of visible rings, uniform integer on [5, 20]
    RingCount,
    /// Dark-ring diameters of orders 1..=15 for one lens drawn from [100, 300] mm
    Diameter,
    /// Relative measurement error, uniform on [0, 5] %
    MeasurementError,
    /// Fringe intensity 50 + 50·cos(2πi/n) across one period, %
    Intensity,
}

impl DashboardParameter {
    pub const ALL: [DashboardParameter; 6] = [
        DashboardParameter::Radius,
        DashboardParameter::Wavelength,
        DashboardParameter::RingCount,
        DashboardParameter::Diameter,
        DashboardParameter::MeasurementError,
        DashboardParameter::Intensity,
    ];

    /// Draw `count` values from this parameter's distribution.
    pub fn sample<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<f64> {
        match self {
            DashboardParameter::Radius => {
                (0..count).map(|_| rng.random_range(100.0..300.0)).collect()
            }
            DashboardParameter::Wavelength => {
                (0..count).map(|_| rng.random_range(400.0..700.0)).collect()
            }
            DashboardParameter::RingCount => {
                (0..count).map(|_| rng.random_range(5..=20u32) as f64).collect()
            }
            DashboardParameter::Diameter => {
                let radius_mm: f64 = rng.random_range(100.0..300.0);
                (0..count)
                    .map(|i| {
                        let order = (i % 15 + 1) as f64;
                        (4.0 * DIAMETER_WAVELENGTH_MM * radius_mm * order).sqrt()
                    })
                    .collect()
            }
            DashboardParameter::MeasurementError => {
                (0..count).map(|_| rng.random_range(0.0..5.0)).collect()
            }
            DashboardParameter::Intensity => (0..count)
                .map(|i| {
                    let phase = i as f64 / count as f64 * 2.0 * PI;
                    50.0 + 50.0 * phase.cos()
                })
                .collect(),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            DashboardParameter::Radius => "mm",
            DashboardParameter::Wavelength => "nm",
            DashboardParameter::RingCount => "",
            DashboardParameter::Diameter => "mm",
            DashboardParameter::MeasurementError => "%",
            DashboardParameter::Intensity => "%",
        }
    }
}

impl fmt::Display for DashboardParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DashboardParameter::Radius => "radius",
            DashboardParameter::Wavelength => "wavelength",
            DashboardParameter::RingCount => "ring count",
            DashboardParameter::Diameter => "diameter",
            DashboardParameter::MeasurementError => "measurement error",
            DashboardParameter::Intensity => "intensity",
        };
        write!(f, "{name}")
    }
}

/// Pairwise correlation of `count` seeded samples of each parameter.
///
/// Samples are drawn sequentially from one seeded stream, then the pairs
/// are correlated in parallel.
///
/// Entry `[i, j]` correlates `params[i]` with `params[j]`. The diagonal is
/// 1 and the matrix is symmetric.
///
/// # Errors
/// Propagates the `StatsError` of a pair that cannot be correlated, for
/// example fewer than two samples or a constant series.
pub fn correlation_matrix(
    params: &[DashboardParameter],
    count: usize,
    method: CorrelationMethod,
    seed: u64,
) -> Result<Array2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let series: Vec<Vec<f64>> = params.iter().map(|p| p.sample(count, &mut rng)).collect();

    let n = params.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    let coefficients = pairs
        .par_iter()
        .map(|&(i, j)| correlate(&series[i], &series[j], method).map(|r| (i, j, r.coefficient)))
        .collect::<std::result::Result<Vec<_>, StatsError>>()?;

    let mut matrix = Array2::<f64>::eye(n);
    for (i, j, r) in coefficients {
        matrix[[i, j]] = r;
        matrix[[j, i]] = r;
    }

    log::debug!("{method} correlation matrix over {n} parameters, {count} samples each");
    Ok(matrix)
}

/// Systematic error sources of the experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSource {
    /// Lens not seated at a single contact point
    Contact,
    /// Surface figure error of the lens or flat
    Surface,
    /// Illumination not monochromatic or not at normal incidence
    Light,
    /// Reading error of the travelling microscope scale
    Reading,
    /// Judging the ring centre line
    Judgment,
}

impl ErrorSource {
    pub const ALL: [ErrorSource; 5] = [
        ErrorSource::Contact,
        ErrorSource::Surface,
        ErrorSource::Light,
        ErrorSource::Reading,
        ErrorSource::Judgment,
    ];

    /// Fraction of a relative error that carries through to the radius
    pub fn impact_factor(&self) -> f64 {
        match self {
            ErrorSource::Contact => 1.2,
            ErrorSource::Surface => 0.9,
            ErrorSource::Light => 0.6,
            ErrorSource::Reading => 0.4,
            ErrorSource::Judgment => 0.25,
        }
    }
}

impl fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorSource::Contact => "contact",
            ErrorSource::Surface => "surface",
            ErrorSource::Light => "light source",
            ErrorSource::Reading => "reading",
            ErrorSource::Judgment => "judgment",
        };
        write!(f, "{name}")
    }
}

/// Radius shift in mm caused by a `magnitude_pct` error of `source` on a
/// lens of `base_radius_mm`.
pub fn error_impact(base_radius_mm: f64, magnitude_pct: f64, source: ErrorSource) -> f64 {
    base_radius_mm * (magnitude_pct / 100.0) * source.impact_factor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        let within =
            |values: &[f64], lo: f64, hi: f64| values.iter().all(|v| (lo..=hi).contains(v));

        assert!(within(&DashboardParameter::Radius.sample(200, &mut rng), 100.0, 300.0));
        assert!(within(&DashboardParameter::Wavelength.sample(200, &mut rng), 400.0, 700.0));
        assert!(within(&DashboardParameter::MeasurementError.sample(200, &mut rng), 0.0, 5.0));

        let rings = DashboardParameter::RingCount.sample(200, &mut rng);
        assert!(within(&rings, 5.0, 20.0));
        assert!(rings.iter().all(|v| v.fract() == 0.0));

        let intensity = DashboardParameter::Intensity.sample(4, &mut rng);
        assert_relative_eq!(intensity[0], 100.0);
        assert_relative_eq!(intensity[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diameters_follow_ring_law() {
        let mut rng = StdRng::seed_from_u64(9);
        let d = DashboardParameter::Diameter.sample(30, &mut rng);
        // D² / m is constant for one lens, and the pattern repeats every 15
        let k = d[0] * d[0];
        assert_relative_eq!(d[3] * d[3] / 4.0, k, epsilon = 1e-12);
        assert_relative_eq!(d[15], d[0]);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let params = DashboardParameter::ALL;
        let matrix = correlation_matrix(&params, 50, CorrelationMethod::Pearson, 42).unwrap();
        assert_eq!(matrix.dim(), (6, 6));

        for i in 0..6 {
            assert_eq!(matrix[[i, i]], 1.0);
            for j in 0..6 {
                assert_eq!(matrix[[i, j]], matrix[[j, i]]);
                assert!((-1.0..=1.0).contains(&matrix[[i, j]]));
            }
        }

        let again = correlation_matrix(&params, 50, CorrelationMethod::Pearson, 42).unwrap();
        assert_eq!(matrix, again);
    }

    #[test]
    fn test_rank_methods_run() {
        let params = [DashboardParameter::Diameter, DashboardParameter::Intensity];
        for method in [CorrelationMethod::Spearman, CorrelationMethod::Kendall] {
            let matrix = correlation_matrix(&params, 30, method, 1).unwrap();
            assert!(matrix[[0, 1]].is_finite());
        }
    }

    #[test]
    fn test_too_few_samples_fails() {
        let params = [DashboardParameter::Radius, DashboardParameter::Wavelength];
        assert!(correlation_matrix(&params, 1, CorrelationMethod::Pearson, 0).is_err());
    }

    #[test]
    fn test_error_impact_table() {
        assert_relative_eq!(error_impact(100.0, 2.0, ErrorSource::Contact), 2.4, epsilon = 1e-12);
        assert_relative_eq!(error_impact(100.0, 2.0, ErrorSource::Judgment), 0.5, epsilon = 1e-12);

        let impacts: Vec<f64> = ErrorSource::ALL
            .iter()
            .map(|s| error_impact(100.0, 1.0, *s))
            .collect();
        for pair in impacts.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }
}
