//! Type-safe lengths for lens radii and wavelengths.
//!
//! Radii are quoted in millimetres and wavelengths in nanometres, while the
//! ring formulas need both in the same unit. Carrying them as `uom` lengths
//! keeps that conversion in one place.

use uom::si::length::{meter, micrometer, millimeter, nanometer};

/// Type alias for length measurements with convenient methods
pub type Length = uom::si::f64::Length;

/// Extension trait for the unit conversions used by the ring formulas
pub trait LengthExt {
    /// Create length from nanometers (wavelengths)
    fn from_nanometers(nm: f64) -> Self;

    /// Get length in nanometers
    fn as_nanometers(&self) -> f64;

    /// Create length from micrometers
    fn from_micrometers(um: f64) -> Self;

    /// Get length in micrometers
    fn as_micrometers(&self) -> f64;

    /// Create length from millimeters (lens radii, ring diameters)
    fn from_millimeters(mm: f64) -> Self;

    /// Get length in millimeters
    fn as_millimeters(&self) -> f64;

    /// Create length from meters
    fn from_meters(m: f64) -> Self;

    /// Get length in meters
    fn as_meters(&self) -> f64;
}

impl LengthExt for Length {
    fn from_nanometers(nm: f64) -> Self {
        Length::new::<nanometer>(nm)
    }

    fn as_nanometers(&self) -> f64 {
        self.get::<nanometer>()
    }

    fn from_micrometers(um: f64) -> Self {
        Length::new::<micrometer>(um)
    }

    fn as_micrometers(&self) -> f64 {
        self.get::<micrometer>()
    }

    fn from_millimeters(mm: f64) -> Self {
        Length::new::<millimeter>(mm)
    }

    fn as_millimeters(&self) -> f64 {
        self.get::<millimeter>()
    }

    fn from_meters(m: f64) -> Self {
        Length::new::<meter>(m)
    }

    fn as_meters(&self) -> f64 {
        self.get::<meter>()
    }
}
