//! Non-fatal spacing checks.
//!
//! Physical print tolerance is left to the print-and-measure procedure. These
//! checks only flag configurations where neighbouring markers can touch.

use std::fmt;

use crate::layout::{FixedGrid, LayoutMode, CAL_POSITION_Y_MULTIPLIER};

/// A warning that does not stop generation.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    InsufficientPadding { padding: f64, minimum: f64 },
    /// Calibration dots reach past the bottom margin into the marker area.
    CalibrationOutsideMargin { dot_radius: f64, margin: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::InsufficientPadding { padding, minimum } => write!(
                f,
                "Warning: Marker padding ({padding:.2}mm) may be insufficient. \
                 Minimum padding should be {minimum:.2}mm to prevent overlap."
            ),
            Advisory::CalibrationOutsideMargin { dot_radius, margin } => write!(
                f,
                "Warning: Calibration dot radius ({dot_radius:.2}mm) is too large for the \
                 {margin:.2}mm page margin and may overlap the bottom row of markers."
            ),
        }
    }
}

/// Smallest padding that keeps adjacent bounding circles apart.
pub fn minimum_padding(bounding_radius: f64) -> f64 {
    2.0 * bounding_radius
}

/// Compare configured padding against the minimum safe padding.
pub fn check_overlap(padding: f64, bounding_radius: f64) -> Vec<Advisory> {
    let minimum = minimum_padding(bounding_radius);
    if padding < minimum {
        vec![Advisory::InsufficientPadding { padding, minimum }]
    } else {
        Vec::new()
    }
}

/// Check that the calibration dots stay inside the bottom margin.
///
/// Dot centers sit `CAL_POSITION_Y_MULTIPLIER * margin` above the bottom edge
/// while the lowest marker ends `margin` above it.
pub fn check_calibration(margin: f64, cal_dot_radius: f64) -> Vec<Advisory> {
    if cal_dot_radius > (1.0 - CAL_POSITION_Y_MULTIPLIER) * margin + 1e-9 {
        vec![Advisory::CalibrationOutsideMargin {
            dot_radius: cal_dot_radius,
            margin,
        }]
    } else {
        Vec::new()
    }
}

/// Gap left between markers on a pre-measured sheet.
pub fn fixed_grid_padding(grid: &FixedGrid, bounding_radius: f64) -> Option<f64> {
    grid.min_spacing()
        .map(|spacing| spacing - 2.0 * bounding_radius)
}

/// Run the overlap check against whatever spacing `mode` produces.
pub fn check_layout(mode: &LayoutMode, bounding_radius: f64) -> Vec<Advisory> {
    match mode {
        LayoutMode::Grid(spec) => check_overlap(spec.padding, bounding_radius),
        LayoutMode::FixedGrid(grid) => fixed_grid_padding(grid, bounding_radius)
            .map(|padding| check_overlap(padding, bounding_radius))
            .unwrap_or_default(),
    }
}
