//! Drawing primitives for markers and the calibration reference.
//!
//! Angles are counter-clockwise from +x in a y-up frame. Shape centers are
//! taken as given; callers that draw in a y-down frame mirror y themselves.

use crate::geometry::MarkerGeometry;
use crate::layout::Point;

/// A filled region of a marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Disc {
        cx: f64,
        cy: f64,
        r: f64,
    },
    /// Annulus slice between two angles (degrees).
    RingSector {
        cx: f64,
        cy: f64,
        inner: f64,
        outer: f64,
        start_deg: f64,
        end_deg: f64,
    },
}

fn arc(
    cx: f64,
    cy: f64,
    r: f64,
    start_deg: f64,
    end_deg: f64,
    steps: usize,
) -> impl Iterator<Item = (f64, f64)> {
    (0..=steps).map(move |i| {
        let t = (start_deg + (end_deg - start_deg) * i as f64 / steps as f64).to_radians();
        (cx + r * t.cos(), cy + r * t.sin())
    })
}

impl Shape {
    /// Closed polygon approximating the shape, in the shape's own frame.
    pub fn outline(&self, steps_per_degree: f64) -> Vec<(f64, f64)> {
        match *self {
            Shape::Disc { cx, cy, r } => {
                let steps = (360.0 * steps_per_degree).ceil().max(8.0) as usize;
                let mut pts: Vec<(f64, f64)> = arc(cx, cy, r, 0.0, 360.0, steps).collect();
                pts.pop();
                pts
            }
            Shape::RingSector {
                cx,
                cy,
                inner,
                outer,
                start_deg,
                end_deg,
            } => {
                let steps = ((end_deg - start_deg) * steps_per_degree).ceil().max(2.0) as usize;
                let mut pts: Vec<(f64, f64)> =
                    arc(cx, cy, outer, start_deg, end_deg, steps).collect();
                pts.extend(arc(cx, cy, inner, end_deg, start_deg, steps));
                pts
            }
        }
    }
}

/// Center dot plus one ring sector per set bit.
pub fn marker_shapes(geometry: &MarkerGeometry, code: u32, cx: f64, cy: f64) -> Vec<Shape> {
    let mut shapes = vec![Shape::Disc {
        cx,
        cy,
        r: geometry.dot_radius,
    }];
    shapes.extend(geometry.filled_sectors(code).map(|i| {
        let (start_deg, end_deg) = geometry.sector(i);
        Shape::RingSector {
            cx,
            cy,
            inner: geometry.inner_radius,
            outer: geometry.outer_radius,
            start_deg,
            end_deg,
        }
    }));
    shapes
}

/// Two dots `spacing` apart for checking print scale with a ruler.
pub fn calibration_shapes(origin: Point, dot_radius: f64, spacing: f64) -> [Shape; 2] {
    [
        Shape::Disc {
            cx: origin.x,
            cy: origin.y,
            r: dot_radius,
        },
        Shape::Disc {
            cx: origin.x + spacing,
            cy: origin.y,
            r: dot_radius,
        },
    ]
}

/// A rasterized marker, grayscale, row-major from the top-left.
#[derive(Debug, Clone)]
pub struct RenderedMarker {
    pub size: usize,
    /// 0 = ink, 255 = paper.
    pub pixels: Vec<u8>,
}

impl RenderedMarker {
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.size + x]
    }
}

/// Rasterize a marker centered on a square canvas of `cell_size()` mm.
///
/// Each pixel is classified at its center; no anti-aliasing.
pub fn rasterize(geometry: &MarkerGeometry, code: u32, px_per_mm: f64) -> RenderedMarker {
    let size = (geometry.cell_size() * px_per_mm).round().max(1.0) as usize;
    let half = size as f64 / 2.0;
    let mut pixels = vec![255u8; size * size];

    for py in 0..size {
        for px in 0..size {
            let dx = (px as f64 + 0.5 - half) / px_per_mm;
            // Image rows grow downward; flip to y-up for the angle.
            let dy = (half - (py as f64 + 0.5)) / px_per_mm;
            let d = (dx * dx + dy * dy).sqrt();

            let ink = if d <= geometry.dot_radius {
                true
            } else if d >= geometry.inner_radius && d <= geometry.outer_radius {
                let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
                let bit = ((angle / geometry.sector_angle) as u32).min(geometry.bits - 1);
                (code >> bit) & 1 == 1
            } else {
                false
            };

            if ink {
                pixels[py * size + px] = 0;
            }
        }
    }

    RenderedMarker { size, pixels }
}
