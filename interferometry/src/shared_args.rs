use crate::error::Result;
use crate::field::FieldConstants;
use crate::params::{OpticalParameters, DEFAULT_RADIUS_MM, DEFAULT_WAVELENGTH_NM};
use clap::{Parser, ValueEnum};

/// Parse wavelength string with units (e.g., "589", "589nm", "0.589um", "589e-9m")
///
/// A bare number is taken as nanometers. The result is in nanometers.
pub fn parse_wavelength(s: &str) -> std::result::Result<f64, String> {
    let s = s.trim();

    let (num_str, nm_per_unit) = if let Some(num) = s.strip_suffix("nm") {
        (num, 1.0)
    } else if let Some(num) = s.strip_suffix("um").or_else(|| s.strip_suffix("μm")) {
        (num, 1e3)
    } else if let Some(num) = s.strip_suffix("mm") {
        (num, 1e6)
    } else if let Some(num) = s.strip_suffix('m') {
        (num, 1e9)
    } else {
        (s, 1.0)
    };

    let value: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid numeric value: {}", num_str))?;

    if !value.is_finite() || value <= 0.0 {
        return Err("Wavelength must be positive".to_string());
    }

    Ok(value * nm_per_unit)
}

/// Intensity shading presets for the synthesised field
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldPreset {
    /// Plain two-beam interference, I = cos²(φ/2)
    Textbook,
    /// Sharpened contrast with a brightness floor and half-wave loss - Default
    Canvas,
    /// Reference pattern used for ring recognition, no half-wave loss
    Recognition,
}

impl std::fmt::Display for FieldPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldPreset::Textbook => write!(f, "textbook"),
            FieldPreset::Canvas => write!(f, "canvas"),
            FieldPreset::Recognition => write!(f, "recognition"),
        }
    }
}

impl FieldPreset {
    /// Get the shading constants for the selected preset
    pub fn constants(&self) -> FieldConstants {
        match self {
            FieldPreset::Textbook => FieldConstants::textbook(),
            FieldPreset::Canvas => FieldConstants::canvas(),
            FieldPreset::Recognition => FieldConstants::recognition(),
        }
    }
}

/// Common arguments shared across the ring binaries
#[derive(Parser, Debug, Clone)]
pub struct SharedRingArgs {
    /// Lens radius of curvature in millimeters
    #[arg(long, default_value_t = DEFAULT_RADIUS_MM)]
    pub radius: f64,

    /// Illumination wavelength (e.g., "589", "589nm", "0.589um")
    #[arg(long, default_value_t = DEFAULT_WAVELENGTH_NM, value_parser = parse_wavelength)]
    pub wavelength: f64,

    /// Highest ring order to enumerate
    #[arg(long, default_value_t = 15)]
    pub max_order: u32,

    /// Field shading preset
    #[arg(long, value_enum, default_value_t = FieldPreset::Canvas)]
    pub preset: FieldPreset,

    /// Seed for synthetic measurement noise
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Enable debug output
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl SharedRingArgs {
    /// Validated optical parameters from the radius and wavelength arguments
    pub fn to_params(&self) -> Result<OpticalParameters> {
        OpticalParameters::new(self.radius, self.wavelength)
    }
}

/// Initialise env_logger, honouring `RUST_LOG` and defaulting to `info`
/// (or `debug` when `debug` is set).
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wavelength_parsing() {
        assert_eq!(parse_wavelength("589").unwrap(), 589.0);
        assert_eq!(parse_wavelength("589nm").unwrap(), 589.0);
        assert_eq!(parse_wavelength(" 632.8 nm ").unwrap(), 632.8);
        assert_relative_eq!(parse_wavelength("0.589um").unwrap(), 589.0, epsilon = 1e-9);
        assert_relative_eq!(parse_wavelength("0.589μm").unwrap(), 589.0, epsilon = 1e-9);
        assert_relative_eq!(parse_wavelength("5.89e-4mm").unwrap(), 589.0, epsilon = 1e-9);
        assert_relative_eq!(parse_wavelength("589e-9m").unwrap(), 589.0, epsilon = 1e-9);

        assert!(parse_wavelength("").is_err());
        assert!(parse_wavelength("red").is_err());
        assert!(parse_wavelength("-589nm").is_err());
        assert!(parse_wavelength("0").is_err());
    }

    #[test]
    fn test_default_args() {
        let args = SharedRingArgs::parse_from(["test"]);
        assert_eq!(args.radius, DEFAULT_RADIUS_MM);
        assert_eq!(args.wavelength, DEFAULT_WAVELENGTH_NM);
        assert_eq!(args.max_order, 15);
        assert_eq!(args.preset, FieldPreset::Canvas);
        assert!(!args.debug);
        assert_eq!(args.to_params().unwrap(), OpticalParameters::default());
    }

    #[test]
    fn test_args_with_units() {
        let args = SharedRingArgs::parse_from([
            "test",
            "--radius",
            "250",
            "--wavelength",
            "0.6328um",
            "--preset",
            "recognition",
        ]);
        let params = args.to_params().unwrap();
        assert_relative_eq!(params.radius_mm(), 250.0, epsilon = 1e-9);
        assert_relative_eq!(params.wavelength_nm(), 632.8, epsilon = 1e-9);
        assert_eq!(args.preset.constants(), FieldConstants::recognition());
    }

    #[test]
    fn test_invalid_radius_rejected_on_conversion() {
        let args = SharedRingArgs::parse_from(["test", "--radius=-5"]);
        assert!(args.to_params().is_err());
    }

    #[test]
    fn test_preset_display() {
        assert_eq!(FieldPreset::Textbook.to_string(), "textbook");
        assert_eq!(FieldPreset::Canvas.to_string(), "canvas");
    }
}
