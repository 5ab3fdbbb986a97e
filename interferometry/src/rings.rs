//! Ring geometry: radii and diameters of the dark and bright rings.
//!
//! For a plano-convex lens of radius R resting on a flat, under
//! illumination of wavelength λ, the air gap at distance r from contact is
//! h = r²/(2R). Reflected light shows
//!
//! ```text
//! dark ring m:    D² = 4·λ·R·m
//! bright ring m:  D² = 4·λ·R·(m − ½)
//! ```
//!
//! for m = 1, 2, 3, ... The half-order offset of the bright rings comes from
//! the half-wave phase loss on reflection at the lower surface.
//!
//! Two entry points are provided. [`enumerate_rings`] validates its inputs
//! and reports every failure. [`enumerate_rings_safe`] is for interactive
//! callers that must always draw something: it logs the failure and returns
//! [`fallback_rings`].

use fringe_math::LinearFit;

use crate::error::{OpticsError, Result};
use crate::params::{OpticalParameters, RingKind, RingRecord};

/// Canvas fraction used as the outermost drawable ring radius
const CANVAS_RADIUS_FRACTION: f64 = 0.45;

/// Physical radius shown at the edge of a canvas, mm
const CANVAS_SPAN_MM: f64 = 5.0;

/// Pixel tolerance when picking a ring with the pointer
pub const DEFAULT_PICK_TOLERANCE_PX: f64 = 10.0;

/// Mapping from millimetres to display pixels and the drawable radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayWindow {
    pub pixels_per_mm: f64,
    /// Rings with a larger pixel radius are left out
    pub max_pixel_radius: f64,
}

impl DisplayWindow {
    /// Window for a square canvas `canvas_px` wide.
    ///
    /// The outermost ring may reach 45% of the canvas width, and that radius
    /// corresponds to 5 mm on the lens.
    pub fn for_canvas(canvas_px: u32) -> Self {
        let max_pixel_radius = canvas_px as f64 * CANVAS_RADIUS_FRACTION;
        Self {
            pixels_per_mm: max_pixel_radius / CANVAS_SPAN_MM,
            max_pixel_radius,
        }
    }

    fn validate(&self) -> Result<()> {
        crate::error::require_positive("pixels_per_mm", self.pixels_per_mm)?;
        crate::error::require_positive("max_pixel_radius", self.max_pixel_radius)?;
        Ok(())
    }
}

/// Options for ring enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingOptions {
    /// Highest order m computed for each ring kind
    pub max_order: u32,
    /// Pixel mapping and cutoff, `None` for physical radii only
    pub display: Option<DisplayWindow>,
}

impl Default for RingOptions {
    fn default() -> Self {
        Self {
            max_order: 15,
            display: None,
        }
    }
}

impl RingOptions {
    pub fn with_display(mut self, display: DisplayWindow) -> Self {
        self.display = Some(display);
        self
    }
}

fn ring_record(
    params: &OpticalParameters,
    order: u32,
    kind: RingKind,
    display: Option<&DisplayWindow>,
) -> Option<RingRecord> {
    let effective = kind.effective_order(order);
    let radius_mm = (effective * params.wavelength_mm() * params.radius_mm()).sqrt();
    if !radius_mm.is_finite() || radius_mm < 0.0 {
        return None;
    }

    let pixel_radius = match display {
        Some(window) => {
            let px = radius_mm * window.pixels_per_mm;
            if !px.is_finite() || px > window.max_pixel_radius {
                return None;
            }
            Some(px)
        }
        None => None,
    };

    let diameter_mm = 2.0 * radius_mm;
    Some(RingRecord {
        order,
        kind,
        radius_mm,
        diameter_mm,
        diameter_squared_mm2: diameter_mm * diameter_mm,
        pixel_radius,
    })
}

fn compute_rings(
    params: &OpticalParameters,
    max_order: u32,
    display: Option<&DisplayWindow>,
) -> Vec<RingRecord> {
    let mut rings: Vec<RingRecord> = [RingKind::Dark, RingKind::Bright]
        .into_iter()
        .flat_map(|kind| (1..=max_order).filter_map(move |m| ring_record(params, m, kind, display)))
        .collect();

    rings.sort_by(|a, b| a.radius_mm.total_cmp(&b.radius_mm));
    rings
}

/// Enumerate dark and bright rings for orders 1..=`max_order`, sorted by
/// physical radius.
///
/// # Errors
/// `OpticsError::InvalidParameter` when `max_order` is zero, the display
/// window is not finite and positive, or its cutoff excludes every ring.
///
/// # Examples
/// ```rust
/// use interferometry::rings::{enumerate_rings, RingOptions};
/// use interferometry::{OpticalParameters, RingKind};
///
/// let params = OpticalParameters::new(100.0, 589.0).unwrap();
/// let rings = enumerate_rings(&params, &RingOptions::default()).unwrap();
///
/// // The first bright ring lies inside the first dark ring
/// assert_eq!(rings[0].kind, RingKind::Bright);
/// assert_eq!(rings.len(), 30);
/// ```
pub fn enumerate_rings(
    params: &OpticalParameters,
    options: &RingOptions,
) -> Result<Vec<RingRecord>> {
    if options.max_order == 0 {
        return Err(OpticsError::InvalidParameter {
            name: "max_order",
            value: 0.0,
            reason: "at least one ring order is required",
        });
    }
    if let Some(window) = &options.display {
        window.validate()?;
    }

    let rings = compute_rings(params, options.max_order, options.display.as_ref());
    if rings.is_empty() {
        return Err(OpticsError::InvalidParameter {
            name: "max_pixel_radius",
            value: options.display.map_or(0.0, |w| w.max_pixel_radius),
            reason: "display cutoff excludes every ring",
        });
    }

    log::debug!(
        "Enumerated {} rings for {} (max order {})",
        rings.len(),
        params,
        options.max_order
    );
    Ok(rings)
}

/// Deterministic ring set shown when the requested parameters are unusable.
///
/// These are the rings of [`OpticalParameters::default`] under `options`.
/// An unusable option is replaced by its default, and if the display cutoff
/// still excludes every ring the cutoff is dropped.
pub fn fallback_rings(options: &RingOptions) -> Vec<RingRecord> {
    let params = OpticalParameters::default();
    let max_order = if options.max_order == 0 {
        RingOptions::default().max_order
    } else {
        options.max_order
    };
    let display = options.display.filter(|w| w.validate().is_ok());

    let rings = compute_rings(&params, max_order, display.as_ref());
    if rings.is_empty() {
        compute_rings(&params, max_order, None)
    } else {
        rings
    }
}

/// Enumerate rings from raw interactive inputs, never failing.
///
/// `wavelength_m` is in metres, as delivered by wavelength sliders scaled
/// by 1e-9. Any failure is logged at warn level and [`fallback_rings`] is
/// returned instead.
pub fn enumerate_rings_safe(
    radius_mm: f64,
    wavelength_m: f64,
    options: &RingOptions,
) -> Vec<RingRecord> {
    let result = OpticalParameters::from_mm_and_meters(radius_mm, wavelength_m)
        .and_then(|params| enumerate_rings(&params, options));

    match result {
        Ok(rings) => rings,
        Err(e) => {
            log::warn!(
                "Ring enumeration failed for R = {radius_mm} mm, λ = {wavelength_m} m: {e}; \
                 using fallback rings"
            );
            fallback_rings(options)
        }
    }
}

/// The ring whose pixel radius is closest to `pixel_distance`, if within
/// `tolerance_px`.
///
/// Rings enumerated without a display window carry no pixel radius and are
/// never picked.
pub fn nearest_ring(
    rings: &[RingRecord],
    pixel_distance: f64,
    tolerance_px: f64,
) -> Option<&RingRecord> {
    rings
        .iter()
        .filter_map(|ring| {
            ring.pixel_radius
                .map(|px| (ring, (pixel_distance - px).abs()))
        })
        .filter(|(_, diff)| *diff < tolerance_px)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(ring, _)| ring)
}

/// Points on the theoretical line D² = 4·λ·R·x from x = 0.5 to
/// `max_order`, every `step`.
pub fn theoretical_line(params: &OpticalParameters, max_order: u32, step: f64) -> Vec<(f64, f64)> {
    let line = LinearFit {
        slope: params.diameter_squared_slope(),
        intercept: 0.0,
        n: 0,
    };
    line.sample_line(0.5, max_order as f64, step)
}

/// Rings of one kind, preserving order
pub fn rings_of_kind(rings: &[RingRecord], kind: RingKind) -> Vec<RingRecord> {
    rings.iter().filter(|r| r.kind == kind).copied().collect()
}
