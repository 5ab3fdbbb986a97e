//! Seeded measurement noise for synthetic ring data.
//!
//! Ideal ring diameters fit the theoretical line exactly. Real readings
//! carry a few percent of error from judging the ring edge, so synthetic
//! tables used for demonstrations and tests are perturbed here. Every
//! function takes an explicit seed and is reproducible.
//!
//! Noise is multiplicative on D²: a sample becomes `D² · (1 + e)` with `e`
//! drawn either uniformly from `[-a, a]` or from `N(0, σ)`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{OpticsError, Result};
use crate::params::{MeasurementSample, OpticalParameters, RingKind};
use crate::rings::{enumerate_rings, rings_of_kind, RingOptions};

/// Relative error amplitude of a careful reading, ±2%
pub const DEFAULT_RELATIVE_AMPLITUDE: f64 = 0.02;

fn require_fraction(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(OpticsError::InvalidParameter {
            name,
            value,
            reason: "relative error must lie in [0, 1)",
        })
    }
}

/// Perturb every D² by a uniform relative error in `[-amplitude, amplitude]`.
pub fn jitter_samples(
    samples: &[MeasurementSample],
    relative_amplitude: f64,
    seed: u64,
) -> Result<Vec<MeasurementSample>> {
    let amplitude = require_fraction("relative_amplitude", relative_amplitude)?;
    let mut rng = StdRng::seed_from_u64(seed);

    Ok(samples
        .iter()
        .map(|s| {
            let error: f64 = rng.random_range(-amplitude..=amplitude);
            MeasurementSample {
                diameter_squared_mm2: s.diameter_squared_mm2 * (1.0 + error),
                ..*s
            }
        })
        .collect())
}

/// Perturb every D² by a normally distributed relative error.
///
/// Draws are clamped to ±4σ so that no perturbed D² turns negative for
/// σ below 0.25.
pub fn gaussian_jitter_samples(
    samples: &[MeasurementSample],
    relative_sigma: f64,
    seed: u64,
) -> Result<Vec<MeasurementSample>> {
    let sigma = require_fraction("relative_sigma", relative_sigma)?;
    let normal = Normal::new(0.0, sigma).map_err(|_| OpticsError::InvalidParameter {
        name: "relative_sigma",
        value: sigma,
        reason: "not a valid standard deviation",
    })?;
    let mut rng = StdRng::seed_from_u64(seed);

    Ok(samples
        .iter()
        .map(|s| {
            let error = normal.sample(&mut rng).clamp(-4.0 * sigma, 4.0 * sigma);
            MeasurementSample {
                diameter_squared_mm2: s.diameter_squared_mm2 * (1.0 + error),
                ..*s
            }
        })
        .collect())
}

/// Theoretical rings of one kind for orders 1..=`max_order`, with uniform
/// relative jitter applied.
pub fn synthetic_measurements(
    params: &OpticalParameters,
    kind: RingKind,
    max_order: u32,
    relative_amplitude: f64,
    seed: u64,
) -> Result<Vec<MeasurementSample>> {
    let options = RingOptions {
        max_order,
        display: None,
    };
    let rings = enumerate_rings(params, &options)?;
    let ideal: Vec<MeasurementSample> = rings_of_kind(&rings, kind)
        .iter()
        .map(MeasurementSample::from)
        .collect();

    log::debug!(
        "Synthesizing {} {kind} ring readings with ±{:.1}% error (seed {seed})",
        ideal.len(),
        relative_amplitude * 100.0
    );
    jitter_samples(&ideal, relative_amplitude, seed)
}
