//! Optical parameters and the records passed between the ring, field and
//! recovery modules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::{VISIBLE_MAX_NM, VISIBLE_MIN_NM};
use crate::error::{require_in_range, require_positive, Result};
use crate::units::{Length, LengthExt};

/// Lens radius used when no other value is supplied, in millimetres
pub const DEFAULT_RADIUS_MM: f64 = 100.0;

/// Sodium D line, the default illumination, in nanometres
pub const DEFAULT_WAVELENGTH_NM: f64 = 589.0;

/// Longest accepted lens radius, in millimetres
pub const MAX_RADIUS_MM: f64 = 10_000.0;

fn checked_radius_mm(radius_mm: f64) -> Result<f64> {
    require_positive("radius_mm", radius_mm)?;
    require_in_range(
        "radius_mm",
        radius_mm,
        0.0,
        MAX_RADIUS_MM,
        "lens radius must not exceed 10000 mm",
    )
}

/// Slack at the band edges for metre/nanometre conversion rounding
const BAND_EDGE_TOLERANCE_NM: f64 = 1e-6;

/// Reject wavelengths outside the visible band [380, 780] nm.
pub(crate) fn checked_wavelength_nm(wavelength_nm: f64) -> Result<f64> {
    require_in_range(
        "wavelength_nm",
        wavelength_nm,
        VISIBLE_MIN_NM - BAND_EDGE_TOLERANCE_NM,
        VISIBLE_MAX_NM + BAND_EDGE_TOLERANCE_NM,
        "wavelength must lie in the visible band 380-780 nm",
    )
}

/// Lens radius of curvature and illumination wavelength.
///
/// Both values are validated on construction: the radius lies in
/// (0, [`MAX_RADIUS_MM`]] and the wavelength in the visible band. Every
/// function that takes an `OpticalParameters` can assume those ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalParameters {
    radius: Length,
    wavelength: Length,
}

impl OpticalParameters {
    /// Build from a radius in millimetres and a wavelength in nanometres.
    ///
    /// # Errors
    /// `OpticsError::InvalidParameter` if the radius is not in
    /// (0, 10000] mm or the wavelength is not in [380, 780] nm.
    ///
    /// # Examples
    /// ```rust
    /// use interferometry::OpticalParameters;
    ///
    /// let params = OpticalParameters::new(100.0, 589.0).unwrap();
    /// assert!((params.wavelength_mm() - 5.89e-4).abs() < 1e-15);
    /// assert!(OpticalParameters::new(0.0, 589.0).is_err());
    /// assert!(OpticalParameters::new(100.0, 1064.0).is_err());
    /// ```
    pub fn new(radius_mm: f64, wavelength_nm: f64) -> Result<Self> {
        let radius_mm = checked_radius_mm(radius_mm)?;
        let wavelength_nm = checked_wavelength_nm(wavelength_nm)?;
        Ok(Self {
            radius: Length::from_millimeters(radius_mm),
            wavelength: Length::from_nanometers(wavelength_nm),
        })
    }

    /// Build from a radius in millimetres and a wavelength in metres.
    pub fn from_mm_and_meters(radius_mm: f64, wavelength_m: f64) -> Result<Self> {
        let radius_mm = checked_radius_mm(radius_mm)?;
        let wavelength = Length::from_meters(wavelength_m);
        checked_wavelength_nm(wavelength.as_nanometers())?;
        Ok(Self {
            radius: Length::from_millimeters(radius_mm),
            wavelength,
        })
    }

    /// Build from `uom` lengths.
    pub fn from_lengths(radius: Length, wavelength: Length) -> Result<Self> {
        Self::new(radius.as_millimeters(), wavelength.as_nanometers())
    }

    pub fn radius(&self) -> Length {
        self.radius
    }

    pub fn wavelength(&self) -> Length {
        self.wavelength
    }

    pub fn radius_mm(&self) -> f64 {
        self.radius.as_millimeters()
    }

    pub fn wavelength_mm(&self) -> f64 {
        self.wavelength.as_millimeters()
    }

    pub fn wavelength_nm(&self) -> f64 {
        self.wavelength.as_nanometers()
    }

    pub fn wavelength_m(&self) -> f64 {
        self.wavelength.as_meters()
    }

    /// Slope of D² against effective order, 4·λ·R in mm²
    pub fn diameter_squared_slope(&self) -> f64 {
        4.0 * self.wavelength_mm() * self.radius_mm()
    }
}

impl Default for OpticalParameters {
    fn default() -> Self {
        Self {
            radius: Length::from_millimeters(DEFAULT_RADIUS_MM),
            wavelength: Length::from_nanometers(DEFAULT_WAVELENGTH_NM),
        }
    }
}

impl fmt::Display for OpticalParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R = {:.2} mm, λ = {:.1} nm",
            self.radius_mm(),
            self.wavelength_nm()
        )
    }
}

/// Dark rings satisfy 2h = mλ, bright rings 2h = (m − ½)λ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingKind {
    Dark,
    Bright,
}

impl RingKind {
    /// Regression abscissa for ring order `m`
    pub fn effective_order(&self, order: u32) -> f64 {
        match self {
            RingKind::Dark => order as f64,
            RingKind::Bright => order as f64 - 0.5,
        }
    }
}

impl fmt::Display for RingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingKind::Dark => write!(f, "dark"),
            RingKind::Bright => write!(f, "bright"),
        }
    }
}

/// One theoretical ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingRecord {
    pub order: u32,
    pub kind: RingKind,
    pub radius_mm: f64,
    pub diameter_mm: f64,
    pub diameter_squared_mm2: f64,
    /// Radius on the display canvas when a display window was requested
    pub pixel_radius: Option<f64>,
}

impl RingRecord {
    pub fn effective_order(&self) -> f64 {
        self.kind.effective_order(self.order)
    }
}

/// One measured ring: its order, its kind and the squared diameter read off
/// the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSample {
    pub order: u32,
    pub kind: RingKind,
    pub diameter_squared_mm2: f64,
}

impl MeasurementSample {
    pub fn new(order: u32, kind: RingKind, diameter_squared_mm2: f64) -> Self {
        Self {
            order,
            kind,
            diameter_squared_mm2,
        }
    }

    /// m for dark rings, m − 0.5 for bright rings
    pub fn effective_order(&self) -> f64 {
        self.kind.effective_order(self.order)
    }

    /// Measured diameter in millimetres
    pub fn diameter_mm(&self) -> f64 {
        self.diameter_squared_mm2.sqrt()
    }
}

impl From<&RingRecord> for MeasurementSample {
    fn from(ring: &RingRecord) -> Self {
        Self {
            order: ring.order,
            kind: ring.kind,
            diameter_squared_mm2: ring.diameter_squared_mm2,
        }
    }
}

/// Outcome of the least-squares radius recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Fitted slope of D² against effective order, mm²
    pub slope: f64,
    /// Fitted intercept, mm²; near zero for a clean contact
    pub intercept: f64,
    pub r_squared: f64,
    /// Residual standard error, mm²
    pub standard_error: f64,
    pub slope_standard_error: f64,
    pub radius_mm: f64,
    /// Half-width of the 95% confidence interval on the radius, mm
    pub radius_uncertainty_mm: f64,
    /// Student-t critical value used for the confidence interval
    pub t_critical: f64,
    /// Samples that entered the fit
    pub n_used: usize,
    /// Samples dropped as non-finite or non-positive
    pub n_rejected: usize,
    /// Deviation from a known radius, percent
    pub relative_error_pct: Option<f64>,
}

impl FitResult {
    /// Record the relative error against a known radius
    pub fn with_ground_truth(mut self, true_radius_mm: f64) -> Self {
        self.relative_error_pct =
            crate::recovery::relative_error_pct(self.radius_mm, true_radius_mm);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpticsError;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_conversions() {
        let params = OpticalParameters::new(100.0, 589.0).unwrap();
        assert_relative_eq!(params.radius_mm(), 100.0, epsilon = 1e-12);
        assert_relative_eq!(params.wavelength_nm(), 589.0, epsilon = 1e-9);
        assert_relative_eq!(params.wavelength_mm(), 5.89e-4, epsilon = 1e-15);
        assert_relative_eq!(params.wavelength_m(), 5.89e-7, epsilon = 1e-18);

        let from_m = OpticalParameters::from_mm_and_meters(100.0, 5.89e-7).unwrap();
        assert_relative_eq!(from_m.wavelength_nm(), 589.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        for (r, l) in [(0.0, 589.0), (-1.0, 589.0), (100.0, 0.0), (f64::NAN, 589.0)] {
            assert!(matches!(
                OpticalParameters::new(r, l),
                Err(OpticsError::InvalidParameter { .. })
            ));
        }
        assert!(OpticalParameters::from_mm_and_meters(100.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parameter_range_limits() {
        // Edges of the accepted ranges
        assert!(OpticalParameters::new(MAX_RADIUS_MM, 589.0).is_ok());
        assert!(OpticalParameters::new(100.0, VISIBLE_MIN_NM).is_ok());
        assert!(OpticalParameters::new(100.0, VISIBLE_MAX_NM).is_ok());

        // Just outside them
        for (r, l) in [
            (10_000.5, 589.0),
            (1e9, 200.0),
            (100.0, 379.9),
            (100.0, 780.1),
            (100.0, 1e7),
        ] {
            assert!(
                matches!(
                    OpticalParameters::new(r, l),
                    Err(OpticsError::InvalidParameter { .. })
                ),
                "R = {r} mm, λ = {l} nm accepted"
            );
        }

        let err = OpticalParameters::new(100.0, 1e7).unwrap_err();
        assert!(matches!(
            err,
            OpticsError::InvalidParameter {
                name: "wavelength_nm",
                ..
            }
        ));

        // A 10 mm wavelength passed in metres
        assert!(OpticalParameters::from_mm_and_meters(100.0, 1e-2).is_err());
        assert!(OpticalParameters::from_mm_and_meters(100.0, 1.1e-6).is_err());
        assert!(OpticalParameters::from_mm_and_meters(20_000.0, 589e-9).is_err());
        assert!(OpticalParameters::from_mm_and_meters(100.0, 380e-9).is_ok());
        assert!(OpticalParameters::from_mm_and_meters(100.0, 780e-9).is_ok());
    }

    #[test]
    fn test_default_is_sodium_100mm() {
        let params = OpticalParameters::default();
        assert_relative_eq!(params.radius_mm(), DEFAULT_RADIUS_MM);
        assert_relative_eq!(params.wavelength_nm(), DEFAULT_WAVELENGTH_NM, epsilon = 1e-9);
        assert_relative_eq!(params.diameter_squared_slope(), 0.2356, epsilon = 1e-12);
    }

    #[test]
    fn test_effective_order() {
        assert_eq!(MeasurementSample::new(3, RingKind::Dark, 1.0).effective_order(), 3.0);
        assert_eq!(MeasurementSample::new(3, RingKind::Bright, 1.0).effective_order(), 2.5);
    }

    #[test]
    fn test_sample_json_format() {
        let sample = MeasurementSample::new(2, RingKind::Bright, 0.35);
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"order":2,"kind":"bright","diameter_squared_mm2":0.35}"#);
    }
}
