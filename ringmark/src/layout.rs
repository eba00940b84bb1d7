//! Page packing and pagination.
//!
//! Coordinates are page millimeters with the origin at the top-left corner
//! and y growing downward. Renderers with a bottom-up origin flip on output.

use crate::assign::MarkerAssignment;
use crate::error::{ConfigError, Error, LayoutError};

/// Calibration reference sits this fraction of the margin above the bottom edge.
pub const CAL_POSITION_Y_MULTIPLIER: f64 = 0.8;

/// Absorbs float rounding when the usable width is an exact multiple of the pitch.
const FIT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Physical page dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// US Letter, 8.5 x 11 in.
    pub const LETTER: PageSize = PageSize {
        width: 215.9,
        height: 279.4,
    };
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
    pub const A3: PageSize = PageSize {
        width: 297.0,
        height: 420.0,
    };

    pub fn new(width: f64, height: f64) -> PageSize {
        PageSize { width, height }
    }
}

/// Computed grid: margin and padding around markers of a known radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub page: PageSize,
    pub margin: f64,
    pub padding: f64,
}

/// Pre-measured label sheet: absolute slot centers in fill order.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedGrid {
    pub name: String,
    pub page: PageSize,
    pub slots: Vec<Point>,
}

impl FixedGrid {
    /// Slots on a regular lattice, filled left-to-right, top-to-bottom.
    pub fn lattice(
        name: &str,
        page: PageSize,
        first: Point,
        pitch_x: f64,
        pitch_y: f64,
        columns: usize,
        rows: usize,
    ) -> FixedGrid {
        let slots = (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |col| {
                    Point::new(
                        first.x + col as f64 * pitch_x,
                        first.y + row as f64 * pitch_y,
                    )
                })
            })
            .collect();
        FixedGrid {
            name: name.to_string(),
            page,
            slots,
        }
    }

    /// Avery 6450: 63 one-inch round labels, 7 columns by 9 rows on US Letter.
    pub fn avery_6450() -> FixedGrid {
        FixedGrid::lattice(
            "AVERY 6450",
            PageSize::LETTER,
            Point::new(20.32, 22.86),
            29.21,
            29.21,
            7,
            9,
        )
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Smallest center-to-center distance between any two slots.
    pub fn min_spacing(&self) -> Option<f64> {
        let mut best: Option<f64> = None;
        for (i, a) in self.slots.iter().enumerate() {
            for b in &self.slots[i + 1..] {
                let d = a.distance(b);
                best = Some(best.map_or(d, |m| m.min(d)));
            }
        }
        best
    }
}

/// How markers are positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutMode {
    Grid(GridSpec),
    FixedGrid(FixedGrid),
}

impl LayoutMode {
    pub fn page(&self) -> PageSize {
        match self {
            LayoutMode::Grid(spec) => spec.page,
            LayoutMode::FixedGrid(grid) => grid.page,
        }
    }
}

/// Columns and rows of a computed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GridDims {
    pub columns: usize,
    pub rows: usize,
}

impl GridDims {
    /// Slots per page, or `None` when the count overflows `usize`.
    pub fn capacity(&self) -> Option<usize> {
        self.columns.checked_mul(self.rows)
    }
}

/// Center-to-center distance of adjacent grid slots.
pub fn pitch(padding: f64, bounding_radius: f64) -> f64 {
    2.0 * bounding_radius + padding
}

/// How many markers fit across and down the page.
///
/// One padding gap is added back to the usable length because `n` markers
/// need only `n - 1` gaps between them.
pub fn grid_dimensions(
    page: PageSize,
    margin: f64,
    padding: f64,
    bounding_radius: f64,
) -> GridDims {
    let pitch = pitch(padding, bounding_radius);
    let fit = |length: f64| -> usize {
        let n = ((length - 2.0 * margin + padding) / pitch + FIT_EPSILON).floor();
        if n > 0.0 {
            n as usize
        } else {
            0
        }
    };
    GridDims {
        columns: fit(page.width),
        rows: fit(page.height),
    }
}

/// The first `limit` slot centers of a computed grid, left-to-right,
/// top-to-bottom.
pub fn grid_slots(
    spec: &GridSpec,
    bounding_radius: f64,
    dims: GridDims,
    limit: usize,
) -> Vec<Point> {
    if dims.columns == 0 {
        return Vec::new();
    }
    let pitch = pitch(spec.padding, bounding_radius);
    let origin = spec.margin + bounding_radius;
    let count = dims.capacity().unwrap_or(usize::MAX).min(limit);
    (0..count)
        .map(|i| {
            let (row, col) = (i / dims.columns, i % dims.columns);
            Point::new(origin + col as f64 * pitch, origin + row as f64 * pitch)
        })
        .collect()
}

/// First calibration dot center for a computed-grid page.
pub fn calibration_origin(spec: &GridSpec) -> Point {
    Point::new(
        spec.margin,
        spec.page.height - spec.margin * CAL_POSITION_Y_MULTIPLIER,
    )
}

/// One marker bound to a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub number: u32,
    pub code: u32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Page {
    pub index: usize,
    pub placements: Vec<Placement>,
    /// First calibration dot center, when the page carries a reference.
    pub calibration: Option<Point>,
}

/// Every page of a run, in print order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PagePlan {
    pub page: PageSize,
    /// Markers per page.
    pub capacity: usize,
    pub pages: Vec<Page>,
}

impl PagePlan {
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.pages.iter().flat_map(|p| p.placements.iter())
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Bind assignments to slots, `capacity` per page.
///
/// Assignment `i` lands on page `i / capacity`, slot `i % capacity`. `slots`
/// must hold at least `min(capacity, assignments.len())` centers.
pub fn paginate(
    slots: &[Point],
    capacity: usize,
    assignments: &[MarkerAssignment],
    calibration: Option<Point>,
) -> Vec<Page> {
    if capacity == 0 {
        return Vec::new();
    }
    assignments
        .chunks(capacity)
        .enumerate()
        .map(|(index, chunk)| Page {
            index,
            placements: chunk
                .iter()
                .zip(slots)
                .map(|(a, slot)| Placement {
                    x: slot.x,
                    y: slot.y,
                    number: a.number,
                    code: a.code,
                })
                .collect(),
            calibration,
        })
        .collect()
}

/// Lay out `assignments` across as many pages as needed.
pub fn plan(
    mode: &LayoutMode,
    bounding_radius: f64,
    assignments: &[MarkerAssignment],
) -> Result<PagePlan, Error> {
    require_positive("marker bounding radius", bounding_radius)?;
    let page = mode.page();
    require_positive("page width", page.width)?;
    require_positive("page height", page.height)?;

    let (capacity, pages) = match mode {
        LayoutMode::Grid(spec) => {
            require_positive("page margin", spec.margin)?;
            require_positive("marker padding", spec.padding)?;
            let dims = grid_dimensions(spec.page, spec.margin, spec.padding, bounding_radius);
            let capacity = dims.capacity().ok_or(LayoutError::TooManySlots {
                columns: dims.columns,
                rows: dims.rows,
            })?;
            if capacity == 0 {
                return Err(LayoutError::NoFit {
                    width: spec.page.width,
                    height: spec.page.height,
                    margin: spec.margin,
                    pitch: pitch(spec.padding, bounding_radius),
                    columns: dims.columns,
                    rows: dims.rows,
                }
                .into());
            }
            log::debug!(
                "grid layout: {} columns x {} rows, pitch {:.2}mm",
                dims.columns,
                dims.rows,
                pitch(spec.padding, bounding_radius)
            );
            // Only slots that can receive a marker are materialized.
            let slots = grid_slots(spec, bounding_radius, dims, assignments.len());
            let calibration = Some(calibration_origin(spec));
            let pages = paginate(&slots, capacity, assignments, calibration);
            (capacity, pages)
        }
        LayoutMode::FixedGrid(grid) => {
            if grid.slots.is_empty() {
                return Err(ConfigError::EmptyFixedGrid.into());
            }
            log::debug!("fixed grid '{}': {} slots", grid.name, grid.capacity());
            let capacity = grid.capacity();
            (capacity, paginate(&grid.slots, capacity, assignments, None))
        }
    };

    log::debug!(
        "planned {} markers on {} page(s), {} per page",
        assignments.len(),
        pages.len(),
        capacity
    );

    Ok(PagePlan {
        page,
        capacity,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(n: u32) -> Vec<MarkerAssignment> {
        (0..n)
            .map(|i| MarkerAssignment {
                number: i + 1,
                code: 2 * i + 1,
            })
            .collect()
    }

    fn letter_grid(margin: f64, padding: f64) -> GridSpec {
        GridSpec {
            page: PageSize::LETTER,
            margin,
            padding,
        }
    }

    #[test]
    fn letter_grid_dimensions() {
        let dims = grid_dimensions(PageSize::LETTER, 10.0, 7.5, 9.0);
        assert_eq!(dims.columns, ((215.9 - 20.0 + 7.5) / 25.5_f64).floor() as usize);
        assert_eq!(dims.rows, ((279.4 - 20.0 + 7.5) / 25.5_f64).floor() as usize);
        assert_eq!(dims, GridDims { columns: 7, rows: 10 });
        assert_eq!(dims.capacity(), Some(70));
    }

    #[test]
    fn exact_fit_is_not_lost_to_rounding() {
        // 3 markers of diameter 10 with 2 gaps of 5 span exactly 40.
        let dims = grid_dimensions(PageSize::new(60.0, 60.0), 10.0, 5.0, 5.0);
        assert_eq!(dims.columns, 3);
    }

    #[test]
    fn grid_slots_start_at_margin_plus_radius() {
        let spec = letter_grid(10.0, 7.5);
        let dims = GridDims { columns: 2, rows: 2 };
        let slots = grid_slots(&spec, 9.0, dims, usize::MAX);
        assert_eq!(
            slots,
            vec![
                Point::new(19.0, 19.0),
                Point::new(44.5, 19.0),
                Point::new(19.0, 44.5),
                Point::new(44.5, 44.5),
            ]
        );
    }

    #[test]
    fn grid_slots_stop_at_limit() {
        let spec = letter_grid(10.0, 7.5);
        let dims = GridDims { columns: 2, rows: 2 };
        let slots = grid_slots(&spec, 9.0, dims, 3);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[2], Point::new(19.0, 44.5));
    }

    #[test]
    fn huge_page_capacity_overflow_is_an_error() {
        let dims = grid_dimensions(PageSize::new(1e12, 1e12), 10.0, 5.0, 7.2);
        assert_eq!(dims.capacity(), None);
        let spec = GridSpec {
            page: PageSize::new(1e12, 1e12),
            margin: 10.0,
            padding: 5.0,
        };
        let err = plan(&LayoutMode::Grid(spec), 7.2, &markers(1)).unwrap_err();
        assert!(matches!(err, Error::Layout(LayoutError::TooManySlots { .. })));
    }

    #[test]
    fn large_page_places_only_assigned_markers() {
        let spec = GridSpec {
            page: PageSize::new(2e5, 2e5),
            margin: 10.0,
            padding: 5.0,
        };
        let plan = plan(&LayoutMode::Grid(spec), 7.2, &markers(2)).unwrap();
        assert!(plan.capacity > 100_000_000);
        assert_eq!(plan.pages.len(), 1);
        assert_eq!(plan.pages[0].placements.len(), 2);
        let second = plan.pages[0].placements[1];
        assert!((second.x - 36.6).abs() < 1e-9);
        assert!((second.y - 17.2).abs() < 1e-9);
    }

    #[test]
    fn grid_pages_carry_calibration() {
        let spec = letter_grid(10.0, 7.5);
        let plan = plan(&LayoutMode::Grid(spec), 9.0, &markers(3)).unwrap();
        assert_eq!(plan.pages.len(), 1);
        assert_eq!(plan.capacity, 70);
        let cal = plan.pages[0].calibration.unwrap();
        assert!((cal.x - 10.0).abs() < 1e-12);
        assert!((cal.y - (279.4 - 8.0)).abs() < 1e-9);
    }

    #[test]
    fn pagination_is_continuous() {
        let spec = GridSpec {
            page: PageSize::new(90.0, 120.0),
            margin: 10.0,
            padding: 7.5,
        };
        let assignments = markers(75);
        let plan = plan(&LayoutMode::Grid(spec), 9.0, &assignments).unwrap();
        assert_eq!(plan.capacity, 12);
        assert_eq!(plan.pages.len(), 7);
        assert_eq!(plan.pages[0].placements.last().unwrap().number, 12);
        assert_eq!(plan.pages[1].placements[0].number, 13);
        assert_eq!(plan.pages[6].placements.len(), 3);
        let numbers: Vec<u32> = plan.placements().map(|p| p.number).collect();
        assert_eq!(numbers, (1..=75).collect::<Vec<_>>());
    }

    #[test]
    fn fixed_grid_fills_one_sheet() {
        let grid = FixedGrid::avery_6450();
        assert_eq!(grid.capacity(), 63);
        let plan = plan(&LayoutMode::FixedGrid(grid.clone()), 7.2, &markers(63)).unwrap();
        assert_eq!(plan.pages.len(), 1);
        let page = &plan.pages[0];
        assert!(page.calibration.is_none());
        for (placement, slot) in page.placements.iter().zip(&grid.slots) {
            assert_eq!((placement.x, placement.y), (slot.x, slot.y));
        }
    }

    #[test]
    fn fixed_grid_overflow_paginates() {
        let plan = plan(
            &LayoutMode::FixedGrid(FixedGrid::avery_6450()),
            7.2,
            &markers(64),
        )
        .unwrap();
        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[1].placements.len(), 1);
        assert_eq!(plan.pages[1].placements[0].number, 64);
    }

    #[test]
    fn avery_lattice_is_centered() {
        let grid = FixedGrid::avery_6450();
        let last = grid.slots.last().unwrap();
        assert!((PageSize::LETTER.width - last.x - 20.32).abs() < 1e-9);
        assert!((PageSize::LETTER.height - last.y - 22.86).abs() < 1e-9);
        assert!((grid.min_spacing().unwrap() - 29.21).abs() < 1e-9);
    }

    #[test]
    fn non_positive_inputs_rejected() {
        let err = plan(&LayoutMode::Grid(letter_grid(0.0, 5.0)), 9.0, &markers(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::NonPositive { name: "page margin", .. })
        ));
        let err = plan(&LayoutMode::Grid(letter_grid(10.0, 5.0)), -1.0, &markers(1)).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn oversized_marker_does_not_fit() {
        let err = plan(&LayoutMode::Grid(letter_grid(10.0, 5.0)), 150.0, &markers(1)).unwrap_err();
        assert!(matches!(err, Error::Layout(LayoutError::NoFit { columns: 0, .. })));
    }

    #[test]
    fn empty_fixed_grid_rejected() {
        let grid = FixedGrid {
            name: "empty".into(),
            page: PageSize::LETTER,
            slots: Vec::new(),
        };
        let err = plan(&LayoutMode::FixedGrid(grid), 7.2, &markers(1)).unwrap_err();
        assert_eq!(err, Error::Config(ConfigError::EmptyFixedGrid));
    }
}
