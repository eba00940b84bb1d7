//! Standalone SVG per marker, sized in millimeters.

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use ringmark::geometry::MarkerGeometry;
use ringmark::render::{self, Shape};

/// Build the SVG document for one marker centered on its canvas.
pub fn marker_svg(
    geometry: &MarkerGeometry,
    code: u32,
    number: u32,
) -> Result<String, fmt::Error> {
    let size = geometry.cell_size();
    let c = size / 2.0;
    let mut svg = String::new();

    writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{size:.3}mm" height="{size:.3}mm" viewBox="0 0 {size:.3} {size:.3}">"#
    )?;
    writeln!(
        svg,
        "  <title>Coded target {number} ({} bits, code {code})</title>",
        geometry.bits
    )?;

    // Shapes are built around the origin in a y-up frame, then placed on the
    // y-down canvas.
    for shape in render::marker_shapes(geometry, code, 0.0, 0.0) {
        match shape {
            Shape::Disc { r, .. } => {
                writeln!(
                    svg,
                    r#"  <circle cx="{c:.3}" cy="{c:.3}" r="{r:.3}" fill="black" />"#
                )?;
            }
            Shape::RingSector {
                inner,
                outer,
                start_deg,
                end_deg,
                ..
            } => {
                writeln!(
                    svg,
                    r#"  <path d="{}" fill="black" />"#,
                    sector_path(c, c, inner, outer, start_deg, end_deg)
                )?;
            }
        }
    }

    writeln!(svg, "</svg>")?;
    Ok(svg)
}

fn polar(cx: f64, cy: f64, r: f64, deg: f64) -> (f64, f64) {
    let t = deg.to_radians();
    (cx + r * t.cos(), cy - r * t.sin())
}

/// Annular sector as SVG path data on a y-down canvas.
fn sector_path(
    cx: f64,
    cy: f64,
    inner: f64,
    outer: f64,
    start_deg: f64,
    end_deg: f64,
) -> String {
    let large = if end_deg - start_deg > 180.0 { 1 } else { 0 };
    let (x0, y0) = polar(cx, cy, outer, start_deg);
    let (x1, y1) = polar(cx, cy, outer, end_deg);
    let (x2, y2) = polar(cx, cy, inner, end_deg);
    let (x3, y3) = polar(cx, cy, inner, start_deg);
    format!(
        "M {x0:.3},{y0:.3} A {outer:.3},{outer:.3} 0 {large} 0 {x1:.3},{y1:.3} \
         L {x2:.3},{y2:.3} A {inner:.3},{inner:.3} 0 {large} 1 {x3:.3},{y3:.3} Z"
    )
}

pub fn write_marker_svg(
    geometry: &MarkerGeometry,
    code: u32,
    number: u32,
    path: &Path,
) -> Result<()> {
    let svg = marker_svg(geometry, code, number)
        .with_context(|| format!("formatting SVG for marker {number}"))?;
    std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))
}
