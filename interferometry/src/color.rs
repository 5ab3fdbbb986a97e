//! Wavelength to RGB mapping for monochromatic illumination.
//!
//! The mapping is the usual six-band piecewise-linear approximation of the
//! visible spectrum:
//!
//! | band (nm)   | R            | G            | B            |
//! |-------------|--------------|--------------|--------------|
//! | [380, 440)  | (440−λ)/60   | 0            | 1            |
//! | [440, 490)  | 0            | (λ−440)/50   | 1            |
//! | [490, 510)  | 0            | 1            | (510−λ)/20   |
//! | [510, 580)  | (λ−510)/70   | 1            | 0            |
//! | [580, 645)  | 1            | (645−λ)/65   | 0            |
//! | [645, 780]  | 1            | 0            | 0            |
//!
//! Every channel is continuous across the interior band edges. Wavelengths
//! outside the visible range, and NaN, have no defined spectral colour and
//! map to white.
//!
//! Two variants are provided. [`wavelength_to_rgb`] is the raw physical
//! mapping used to tint interference fields. [`wavelength_to_display_rgb`]
//! boosts saturation and enforces a luminance floor so that swatches stay
//! legible at the deep-violet and deep-red ends.
//!
//! # Examples
//! ```rust
//! use interferometry::color::{wavelength_to_rgb, Rgb};
//!
//! // Sodium light is a strong yellow-orange
//! let sodium = wavelength_to_rgb(589.0);
//! assert_eq!(sodium, Rgb::new(255, 219, 0));
//! assert_eq!(sodium.hex(), "#ffdb00");
//!
//! // Ultraviolet has no display colour
//! assert_eq!(wavelength_to_rgb(300.0), Rgb::WHITE);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest visible wavelength, nm
pub const VISIBLE_MIN_NM: f64 = 380.0;

/// Longest visible wavelength, nm
pub const VISIBLE_MAX_NM: f64 = 780.0;

/// An 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Colour packed as `0xRRGGBB`
    pub fn packed(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// CSS `rgba(r, g, b, a)` string, alpha clamped to [0, 1]
    pub fn to_rgba_string(&self, alpha: f64) -> String {
        let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Lower-case `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:06x}", self.packed())
    }

    /// Channels as fractions of full scale
    pub fn to_unit(&self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

/// Fractional RGB components of wavelength `nm`.
///
/// Returns `(1, 1, 1)` outside [380, 780] nm and for NaN.
pub fn spectral_components(nm: f64) -> (f64, f64, f64) {
    if !(VISIBLE_MIN_NM..=VISIBLE_MAX_NM).contains(&nm) {
        return (1.0, 1.0, 1.0);
    }

    if nm < 440.0 {
        ((440.0 - nm) / (440.0 - 380.0), 0.0, 1.0)
    } else if nm < 490.0 {
        (0.0, (nm - 440.0) / (490.0 - 440.0), 1.0)
    } else if nm < 510.0 {
        (0.0, 1.0, (510.0 - nm) / (510.0 - 490.0))
    } else if nm < 580.0 {
        ((nm - 510.0) / (580.0 - 510.0), 1.0, 0.0)
    } else if nm < 645.0 {
        (1.0, (645.0 - nm) / (645.0 - 580.0), 0.0)
    } else {
        (1.0, 0.0, 0.0)
    }
}

/// Raw colour of wavelength `nm`, each channel `floor(c · 255)`.
pub fn wavelength_to_rgb(nm: f64) -> Rgb {
    let (r, g, b) = spectral_components(nm);
    let channel = |c: f64| (c * 255.0).floor().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// Tuning for [`wavelength_to_display_rgb`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayEnhancement {
    /// Multiplier applied to every channel before clamping to 1
    pub saturation: f64,
    /// Minimum luminance 0.3R + 0.59G + 0.11B
    pub min_luminance: f64,
}

impl Default for DisplayEnhancement {
    fn default() -> Self {
        Self {
            saturation: 1.3,
            min_luminance: 0.3,
        }
    }
}

/// Luminance weights of the display floor
fn luminance(r: f64, g: f64, b: f64) -> f64 {
    0.3 * r + 0.59 * g + 0.11 * b
}

/// Display colour of wavelength `nm`.
///
/// The wavelength is clamped into the visible range, so this never returns
/// the white fallback. Channels are scaled by the saturation factor, then
/// rescaled together if the luminance is below the floor, then rounded.
pub fn wavelength_to_display_rgb(nm: f64, enhancement: &DisplayEnhancement) -> Rgb {
    let nm = if nm.is_nan() {
        VISIBLE_MIN_NM
    } else {
        nm.clamp(VISIBLE_MIN_NM, VISIBLE_MAX_NM)
    };
    let (r, g, b) = spectral_components(nm);

    let boost = |c: f64| (c * enhancement.saturation).min(1.0);
    let (mut r, mut g, mut b) = (boost(r), boost(g), boost(b));

    let current = luminance(r, g, b);
    if current < enhancement.min_luminance {
        let factor = enhancement.min_luminance / current.max(0.01);
        r = (r * factor).min(1.0);
        g = (g * factor).min(1.0);
        b = (b * factor).min(1.0);
    }

    let channel = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_band_anchor_colours() {
        assert_eq!(wavelength_to_rgb(380.0), Rgb::new(255, 0, 255));
        assert_eq!(wavelength_to_rgb(440.0), Rgb::new(0, 0, 255));
        assert_eq!(wavelength_to_rgb(490.0), Rgb::new(0, 255, 255));
        assert_eq!(wavelength_to_rgb(510.0), Rgb::new(0, 255, 0));
        assert_eq!(wavelength_to_rgb(580.0), Rgb::new(255, 255, 0));
        assert_eq!(wavelength_to_rgb(645.0), Rgb::new(255, 0, 0));
        assert_eq!(wavelength_to_rgb(780.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_sodium_uses_floor() {
        // g = 56/65 = 0.8615..., 0.8615 * 255 = 219.7
        assert_eq!(wavelength_to_rgb(589.0), Rgb::new(255, 219, 0));
    }

    #[test]
    fn test_outside_visible_is_white() {
        for nm in [379.9, 780.1, 0.0, -10.0, 1e6, f64::NAN, f64::INFINITY] {
            assert_eq!(wavelength_to_rgb(nm), Rgb::WHITE, "wavelength {nm}");
        }
    }

    #[test]
    fn test_components_in_unit_range() {
        let mut nm = 370.0;
        while nm <= 790.0 {
            let (r, g, b) = spectral_components(nm);
            for c in [r, g, b] {
                assert!((0.0..=1.0).contains(&c), "component {c} at {nm} nm");
            }
            nm += 0.25;
        }
    }

    #[test]
    fn test_continuous_at_band_edges() {
        for edge in [440.0, 490.0, 510.0, 580.0, 645.0] {
            let below = spectral_components(edge - 1e-9);
            let at = spectral_components(edge);
            assert_relative_eq!(below.0, at.0, epsilon = 1e-6);
            assert_relative_eq!(below.1, at.1, epsilon = 1e-6);
            assert_relative_eq!(below.2, at.2, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_packing_and_strings() {
        let c = Rgb::new(255, 219, 0);
        assert_eq!(c.packed(), 0xffdb00);
        assert_eq!(c.hex(), "#ffdb00");
        assert_eq!(c.to_string(), "#ffdb00");
        assert_eq!(c.to_rgba_string(0.5), "rgba(255, 219, 0, 0.5)");
        assert_eq!(c.to_rgba_string(2.0), "rgba(255, 219, 0, 1)");
        assert_eq!(Rgb::new(0, 0, 7).hex(), "#000007");
    }

    #[test]
    fn test_display_variant() {
        let enhance = DisplayEnhancement::default();

        // Saturation pushes sodium green to full scale
        assert_eq!(wavelength_to_display_rgb(589.0, &enhance), Rgb::new(255, 255, 0));
        // Deep red already meets the luminance floor
        assert_eq!(wavelength_to_display_rgb(700.0, &enhance), Rgb::new(255, 0, 0));
        // Out-of-range input is clamped rather than whitened
        assert_eq!(wavelength_to_display_rgb(300.0, &enhance), Rgb::new(255, 0, 255));
        assert_eq!(wavelength_to_display_rgb(900.0, &enhance), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_display_boosts_blue() {
        let enhance = DisplayEnhancement::default();
        let raw = wavelength_to_rgb(460.0).to_unit();
        let shown = wavelength_to_display_rgb(460.0, &enhance).to_unit();

        assert!(luminance(shown[0], shown[1], shown[2]) > luminance(raw[0], raw[1], raw[2]));
        assert!(shown[1] > raw[1]);
    }

    #[test]
    fn test_display_luminance_floor() {
        // At 450 nm saturation alone gives g = 0.26 and luminance 0.263,
        // below the floor, so green is scaled up by 0.3 / 0.263
        let shown = wavelength_to_display_rgb(450.0, &DisplayEnhancement::default());
        assert_eq!(shown, Rgb::new(0, 76, 255));

        let no_floor = DisplayEnhancement {
            saturation: 1.3,
            min_luminance: 0.0,
        };
        assert_eq!(wavelength_to_display_rgb(450.0, &no_floor), Rgb::new(0, 66, 255));
    }
}
