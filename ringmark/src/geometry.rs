//! Ring radii and angular sectors derived from the center dot radius.

use crate::codeset::BitWidth;

/// Inner edge of the coded ring, in dot radii.
pub const RING_INNER_MULTIPLIER: f64 = 1.6;
/// Outer edge of the coded ring, in dot radii.
pub const RING_OUTER_MULTIPLIER: f64 = 2.4;
/// Edge of the square canvas a standalone marker is drawn on, in dot radii.
pub const MARKER_SIZE_MULTIPLIER: f64 = 6.0;
/// Label offset from the marker center along both axes, in dot radii.
pub const LABEL_OFFSET_MULTIPLIER: f64 = 2.8;

/// Immutable marker dimensions in millimeters and degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarkerGeometry {
    pub bits: u32,
    pub dot_radius: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Angular width of one bit sector.
    pub sector_angle: f64,
    /// Radius of the smallest circle containing the printed marker.
    pub bounding_radius: f64,
}

impl MarkerGeometry {
    /// Derive the geometry for a ring width and dot radius.
    ///
    /// `dot_radius` is expected to be validated by the caller.
    pub fn new(bits: BitWidth, dot_radius: f64) -> MarkerGeometry {
        let outer_radius = dot_radius * RING_OUTER_MULTIPLIER;
        MarkerGeometry {
            bits: bits.get(),
            dot_radius,
            inner_radius: dot_radius * RING_INNER_MULTIPLIER,
            outer_radius,
            sector_angle: 360.0 / bits.get() as f64,
            bounding_radius: outer_radius,
        }
    }

    /// Start and end angle of bit `i`, counter-clockwise from +x.
    pub fn sector(&self, i: u32) -> (f64, f64) {
        let start = i as f64 * self.sector_angle;
        (start, start + self.sector_angle)
    }

    /// Indices of the bits of `code` that print as filled sectors.
    pub fn filled_sectors(&self, code: u32) -> impl Iterator<Item = u32> {
        let bits = self.bits;
        (0..bits).filter(move |i| (code >> i) & 1 == 1)
    }

    /// Ring width between inner and outer edge.
    pub fn ring_width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Edge length of a standalone marker canvas.
    pub fn cell_size(&self) -> f64 {
        self.dot_radius * MARKER_SIZE_MULTIPLIER
    }

    /// Offset of the number label from the marker center.
    pub fn label_offset(&self) -> f64 {
        self.dot_radius * LABEL_OFFSET_MULTIPLIER
    }
}
