//! interferometry - Newton's rings optics and radius recovery
//!
//! This crate models the interference pattern formed between a plano-convex
//! lens and an optical flat, and recovers the lens radius from measured ring
//! diameters, including:
//!
//! - **Color** - Visible wavelength to display RGB mapping
//! - **Rings** - Theoretical dark and bright ring geometry and ring picking
//! - **Field** - Parallel synthesis of the 2D interference intensity field
//! - **Recovery** - Least-squares and per-ring robust radius estimators
//! - **Measurement** - Hand-picked ring table with JSON persistence
//! - **Dashboard** - Correlation of experiment quantities and error impact
//!
//! # Example
//!
//! ```rust
//! use interferometry::rings::{enumerate_rings, RingOptions};
//! use interferometry::{recover_radius, MeasurementSample, OpticalParameters, RingKind};
//!
//! let params = OpticalParameters::new(150.0, 632.8).unwrap();
//! let rings = enumerate_rings(&params, &RingOptions::default()).unwrap();
//!
//! let dark: Vec<MeasurementSample> = rings
//!     .iter()
//!     .filter(|r| r.kind == RingKind::Dark)
//!     .map(MeasurementSample::from)
//!     .collect();
//!
//! let fit = recover_radius(&dark, params.wavelength()).unwrap();
//! assert!((fit.radius_mm - 150.0).abs() < 1e-6);
//! ```

pub mod color;
pub mod dashboard;
pub mod error;
pub mod field;
pub mod measurement;
pub mod noise;
pub mod params;
pub mod recovery;
pub mod rings;
pub mod shared_args;
pub mod units;

// Re-export commonly used types
pub use color::{wavelength_to_display_rgb, wavelength_to_rgb, Rgb};
pub use error::{OpticsError, Result};
pub use field::{render_interference_image, synthesize_field, FieldConstants, FieldGrid};
pub use measurement::{MeasurementTable, RingSelection};
pub use params::{FitResult, MeasurementSample, OpticalParameters, RingKind, RingRecord};
pub use recovery::{calculate_radius_by_physics, recover_radius, RobustRadiusEstimate};
pub use rings::{enumerate_rings, enumerate_rings_safe, RingOptions};
