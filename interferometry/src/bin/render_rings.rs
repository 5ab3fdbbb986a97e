//! Newton's rings renderer
//!
//! Synthesises the interference pattern of a lens on an optical flat, writes
//! it as a PNG and logs the theoretical ring table.
//!
//! # Usage
//!
//! ```bash
//! # Sodium light on a 100 mm lens
//! cargo run --release --bin render_rings -- --output rings.png
//!
//! # He-Ne laser, long-focus lens, textbook contrast
//! cargo run --release --bin render_rings -- --radius 500 --wavelength 632.8nm --preset textbook
//!
//! # Contact point displaced by dust
//! cargo run --release --bin render_rings -- --center-offset 12,-5
//! ```
//!
//! By default the image covers the same area of the lens as the 5 mm canvas
//! used for ring picking, scaled to `--size` pixels.

use clap::Parser;
use interferometry::field::{render_interference_image, FieldGrid};
use interferometry::rings::{enumerate_rings, DisplayWindow, RingOptions};
use interferometry::shared_args::{init_logging, SharedRingArgs};
use std::path::PathBuf;

/// Parse a pixel offset in format "dx,dy"
fn parse_offset(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err("Offset must be in format 'dx,dy'".to_string());
    }

    let dx = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid dx value".to_string())?;
    let dy = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid dy value".to_string())?;

    Ok((dx, dy))
}

#[derive(Parser, Debug)]
#[command(
    name = "Newton's Rings Renderer",
    about = "Renders the Newton's rings interference pattern for a lens and wavelength",
    long_about = None
)]
struct Args {
    #[command(flatten)]
    rings: SharedRingArgs,

    /// Image width and height in pixels
    #[arg(long, default_value_t = 600)]
    size: u32,

    /// Width of the imaged area on the lens in mm (defaults to the picking canvas)
    #[arg(long)]
    span_mm: Option<f64>,

    /// Contact point offset from the image centre in pixels (format: "dx,dy")
    #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
    center_offset: Option<(f64, f64)>,

    /// Output PNG path
    #[arg(long, default_value = "newton_rings.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.rings.debug);

    let params = args.rings.to_params()?;
    let window = DisplayWindow::for_canvas(args.size);
    let span_mm = args
        .span_mm
        .unwrap_or(args.size as f64 / window.pixels_per_mm);

    let mut grid = FieldGrid::square(args.size as usize, span_mm);
    if let Some((dx, dy)) = args.center_offset {
        grid = grid.with_center_offset(dx, dy);
    }

    log::info!(
        "Rendering {}x{} px over {:.2} mm for {} ({} preset)",
        args.size,
        args.size,
        span_mm,
        params,
        args.rings.preset
    );

    let image = render_interference_image(&params, &grid, &args.rings.preset.constants())?;
    image.save(&args.output)?;
    log::info!("Wrote {}", args.output.display());

    let options = RingOptions {
        max_order: args.rings.max_order,
        display: None,
    }
    .with_display(window);
    let rings = enumerate_rings(&params, &options)?;

    println!("order\tkind\tr (mm)\tD (mm)\tD² (mm²)\tr (px)");
    for ring in &rings {
        println!(
            "{}\t{}\t{:.4}\t{:.4}\t{:.5}\t{:.1}",
            ring.order,
            ring.kind,
            ring.radius_mm,
            ring.diameter_mm,
            ring.diameter_squared_mm2,
            ring.pixel_radius.unwrap_or(f64::NAN)
        );
    }
    log::info!("{} rings within the canvas", rings.len());

    Ok(())
}
