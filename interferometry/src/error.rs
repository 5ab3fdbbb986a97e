//! Error type shared by the optics engine.

use fringe_math::{FitError, StatsError};
use thiserror::Error;

/// Errors raised by the ring, field and recovery modules.
///
/// Low-level functions fail with one of these instead of substituting
/// placeholder data. The only fallback path is
/// [`enumerate_rings_safe`](crate::rings::enumerate_rings_safe).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpticsError {
    #[error("Invalid parameter {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Degenerate fit: all samples share the same order")]
    DegenerateFit,

    #[error("Fitted slope {slope} does not correspond to a physical radius")]
    NonPhysicalRadius { slope: f64 },

    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),
}

impl From<FitError> for OpticsError {
    fn from(err: FitError) -> Self {
        match err {
            FitError::InsufficientData { needed, got } => {
                OpticsError::InsufficientData { needed, got }
            }
            FitError::DegenerateFit => OpticsError::DegenerateFit,
            FitError::NonFinite { x, .. } if !x.is_finite() => OpticsError::InvalidParameter {
                name: "order",
                value: x,
                reason: "must be finite",
            },
            FitError::NonFinite { y, .. } => OpticsError::InvalidParameter {
                name: "diameter_squared_mm2",
                value: y,
                reason: "must be finite",
            },
        }
    }
}

/// Result alias for the optics engine
pub type Result<T> = std::result::Result<T, OpticsError>;

/// Reject `value` unless it is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(OpticsError::InvalidParameter {
            name,
            value,
            reason: "must be finite and positive",
        })
    }
}

/// Reject `value` unless it is finite and within `[min, max]`.
pub(crate) fn require_in_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    reason: &'static str,
) -> Result<f64> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(OpticsError::InvalidParameter {
            name,
            value,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_errors_map_to_optics_errors() {
        let err: OpticsError = FitError::InsufficientData { needed: 3, got: 2 }.into();
        assert_eq!(err, OpticsError::InsufficientData { needed: 3, got: 2 });

        let err: OpticsError = FitError::DegenerateFit.into();
        assert_eq!(err, OpticsError::DegenerateFit);

        let err: OpticsError = FitError::NonFinite {
            index: 0,
            x: 1.0,
            y: f64::INFINITY,
        }
        .into();
        assert!(matches!(
            err,
            OpticsError::InvalidParameter {
                name: "diameter_squared_mm2",
                ..
            }
        ));
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("radius", 2.5), Ok(2.5));
        assert!(require_positive("radius", 0.0).is_err());
        assert!(require_positive("radius", -1.0).is_err());
        assert!(require_positive("radius", f64::NAN).is_err());
        assert!(require_positive("radius", f64::INFINITY).is_err());
    }

    #[test]
    fn test_display_messages() {
        let err = OpticsError::InvalidParameter {
            name: "wavelength_nm",
            value: -5.0,
            reason: "must be finite and positive",
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter wavelength_nm: -5 (must be finite and positive)"
        );
    }
}
