//! Two-beam interference intensity across the lens contact region.
//!
//! At distance d from the contact point the air gap is h = d²/(2R), the
//! optical path difference between the two reflected beams is δ = 2h, and
//! the phase difference is
//!
//! ```text
//! φ = 2π·δ/λ (+ π with half-wave loss)
//! I = (½·(1 + cos φ))^k
//! ```
//!
//! The exponent k, a display gain and a base brightness are collected in
//! [`FieldConstants`]. The presets reproduce the three looks the rest of the
//! workspace needs: the physical textbook field, the high-contrast
//! interactive canvas, and the recognition-training images that omit the
//! reflection phase.
//!
//! Full-field synthesis evaluates every pixel independently and runs in
//! parallel over the grid through rayon.

use image::RgbImage;
use ndarray::{Array2, Zip};
use std::f64::consts::PI;

use crate::color::{wavelength_to_rgb, Rgb};
use crate::error::{require_positive, OpticsError, Result};
use crate::params::OpticalParameters;

/// Shaping constants applied on top of the two-beam intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConstants {
    /// Exponent k in I = (½(1 + cos φ))^k; below 1 widens the bright fringes
    pub contrast_exponent: f64,
    /// Multiplier applied to the tinted intensity before clamping
    pub gain: f64,
    /// Brightness added to every pixel, as a fraction of full scale
    pub base_brightness: f64,
    /// Add π for the reflection at the optically denser flat
    pub half_wave_loss: bool,
}

impl FieldConstants {
    /// Unmodified two-beam intensity with a dark centre
    pub fn textbook() -> Self {
        Self {
            contrast_exponent: 1.0,
            gain: 1.0,
            base_brightness: 0.0,
            half_wave_loss: true,
        }
    }

    /// High-contrast look of the interactive ring canvas
    pub fn canvas() -> Self {
        Self {
            contrast_exponent: 0.6,
            gain: 1.5,
            base_brightness: 25.0 / 255.0,
            half_wave_loss: true,
        }
    }

    /// Look of the generated recognition-training images, bright centre
    pub fn recognition() -> Self {
        Self {
            contrast_exponent: 0.8,
            gain: 1.0,
            base_brightness: 0.0,
            half_wave_loss: false,
        }
    }
}

impl Default for FieldConstants {
    fn default() -> Self {
        Self::textbook()
    }
}

/// Normalised intensity in [0, 1] at `distance_mm` from the contact point.
///
/// Non-finite distances give 0.
///
/// # Examples
/// ```rust
/// use interferometry::field::{intensity_at, FieldConstants};
/// use interferometry::OpticalParameters;
///
/// let params = OpticalParameters::default();
/// let textbook = FieldConstants::textbook();
///
/// // Contact point is dark under half-wave loss
/// assert!(intensity_at(0.0, &params, &textbook) < 1e-12);
/// ```
pub fn intensity_at(
    distance_mm: f64,
    params: &OpticalParameters,
    constants: &FieldConstants,
) -> f64 {
    if !distance_mm.is_finite() {
        return 0.0;
    }

    let air_gap_mm = distance_mm * distance_mm / (2.0 * params.radius_mm());
    let path_difference_mm = 2.0 * air_gap_mm;

    let mut phase = 2.0 * PI * path_difference_mm / params.wavelength_mm();
    if constants.half_wave_loss {
        phase += PI;
    }

    let two_beam = (0.5 * (1.0 + phase.cos())).clamp(0.0, 1.0);
    two_beam.powf(constants.contrast_exponent)
}

/// Tint `intensity` with `color` and apply gain and base brightness.
pub fn shade(intensity: f64, color: Rgb, constants: &FieldConstants) -> [u8; 3] {
    let [r, g, b] = color.to_unit();
    let channel = |c: f64| {
        let value = c * intensity * constants.gain + constants.base_brightness;
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    [channel(r), channel(g), channel(b)]
}

/// Pixel grid over which a field is synthesised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGrid {
    pub width: usize,
    pub height: usize,
    /// Physical size of one pixel on the lens
    pub mm_per_pixel: f64,
    /// Contact point in pixel coordinates (x, y)
    pub center_px: (f64, f64),
}

impl FieldGrid {
    /// Square grid of `size` pixels spanning `span_mm` across, centred.
    pub fn square(size: usize, span_mm: f64) -> Self {
        Self {
            width: size,
            height: size,
            mm_per_pixel: span_mm / size as f64,
            center_px: (size as f64 / 2.0, size as f64 / 2.0),
        }
    }

    /// Move the contact point by (`dx`, `dy`) pixels.
    pub fn with_center_offset(mut self, dx: f64, dy: f64) -> Self {
        self.center_px.0 += dx;
        self.center_px.1 += dy;
        self
    }

    /// Distance of pixel (`col`, `row`) from the contact point, mm
    pub fn distance_mm(&self, col: usize, row: usize) -> f64 {
        let dx = (col as f64 - self.center_px.0) * self.mm_per_pixel;
        let dy = (row as f64 - self.center_px.1) * self.mm_per_pixel;
        dx.hypot(dy)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OpticsError::InvalidParameter {
                name: "grid_size",
                value: self.width.min(self.height) as f64,
                reason: "grid must have at least one pixel",
            });
        }
        require_positive("mm_per_pixel", self.mm_per_pixel)?;
        for value in [self.center_px.0, self.center_px.1] {
            if !value.is_finite() {
                return Err(OpticsError::InvalidParameter {
                    name: "center_px",
                    value,
                    reason: "must be finite",
                });
            }
        }
        Ok(())
    }
}

/// Intensity over `grid`, indexed `[row, col]` with `height` rows.
///
/// Pixels are computed in parallel and the result does not depend on the
/// order of evaluation.
///
/// # Errors
/// `OpticsError::InvalidParameter` for an empty grid, a non-positive pixel
/// scale or a non-finite centre.
pub fn synthesize_field(
    params: &OpticalParameters,
    grid: &FieldGrid,
    constants: &FieldConstants,
) -> Result<Array2<f64>> {
    grid.validate()?;
    log::debug!(
        "Synthesizing {}x{} field at {:.4} mm/px for {}",
        grid.width,
        grid.height,
        grid.mm_per_pixel,
        params
    );

    let mut field = Array2::<f64>::zeros((grid.height, grid.width));
    Zip::indexed(&mut field).par_for_each(|(row, col), value| {
        *value = intensity_at(grid.distance_mm(col, row), params, constants);
    });

    Ok(field)
}

/// Shade an intensity field into an RGB image.
pub fn render_rgb(field: &Array2<f64>, color: Rgb, constants: &FieldConstants) -> RgbImage {
    let (height, width) = field.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        image::Rgb(shade(field[[y as usize, x as usize]], color, constants))
    })
}

/// Synthesise and shade a field tinted with the colour of the illumination.
pub fn render_interference_image(
    params: &OpticalParameters,
    grid: &FieldGrid,
    constants: &FieldConstants,
) -> Result<RgbImage> {
    let field = synthesize_field(params, grid, constants)?;
    let color = wavelength_to_rgb(params.wavelength_nm());
    Ok(render_rgb(&field, color, constants))
}

/// Intensity along a radius, `samples` points evenly spaced from 0 to
/// `max_distance_mm` inclusive.
pub fn radial_profile(
    params: &OpticalParameters,
    constants: &FieldConstants,
    max_distance_mm: f64,
    samples: usize,
) -> Vec<(f64, f64)> {
    match samples {
        0 => Vec::new(),
        1 => vec![(0.0, intensity_at(0.0, params, constants))],
        _ => {
            let step = max_distance_mm / (samples - 1) as f64;
            (0..samples)
                .map(|i| {
                    let d = i as f64 * step;
                    (d, intensity_at(d, params, constants))
                })
                .collect()
        }
    }
}
