//! PNG output for individual markers.

use std::path::Path;

use anyhow::{Context, Result};
use ringmark::geometry::MarkerGeometry;
use ringmark::render;

const MM_PER_INCH: f64 = 25.4;

/// Rasterize one marker at `dpi` and write it as an 8-bit grayscale PNG.
pub fn write_marker_png(geometry: &MarkerGeometry, code: u32, dpi: u32, path: &Path) -> Result<()> {
    let marker = render::rasterize(geometry, code, dpi as f64 / MM_PER_INCH);
    write_grayscale_png(path, &marker.pixels, marker.size, marker.size, dpi)
}

fn write_grayscale_png(
    path: &Path,
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: u32,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let w = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    // Keep the physical size when the file is printed.
    let ppm = (dpi as f64 / MM_PER_INCH * 1000.0).round() as u32;
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("writing PNG header for {}", path.display()))?;
    writer
        .write_image_data(pixels)
        .with_context(|| format!("writing PNG data for {}", path.display()))?;

    Ok(())
}
