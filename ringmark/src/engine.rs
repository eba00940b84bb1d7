//! Single entry point tying the code space, geometry and layout together.

use std::sync::Arc;

use crate::assign::{self, MarkerAssignment};
use crate::codeset::{BitWidth, CodeSet, CodeSpace};
use crate::config::TargetConfig;
use crate::error::Error;
use crate::geometry::MarkerGeometry;
use crate::layout::{self, LayoutMode, PagePlan};
use crate::validate::{self, Advisory};

/// Owns the per-width code set cache for its lifetime.
#[derive(Debug, Default)]
pub struct Engine {
    codes: CodeSpace,
}

/// Everything a renderer needs for one run.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub config: TargetConfig,
    pub geometry: MarkerGeometry,
    pub mode: LayoutMode,
    pub assignments: Vec<MarkerAssignment>,
    pub plan: PagePlan,
    pub advisories: Vec<Advisory>,
}

impl Engine {
    pub fn new() -> Engine {
        Engine::default()
    }

    pub fn code_set_for(&self, bits: u32) -> Result<Arc<CodeSet>, Error> {
        Ok(self.codes.get(BitWidth::new(bits)?))
    }

    pub fn assign(
        &self,
        bits: u32,
        count: usize,
        start: u32,
    ) -> Result<Vec<MarkerAssignment>, Error> {
        let set = self.code_set_for(bits)?;
        assign::assign(&set, count, start)
    }

    pub fn geometry_for(&self, bits: u32, dot_radius: f64) -> Result<MarkerGeometry, Error> {
        Ok(MarkerGeometry::new(BitWidth::new(bits)?, dot_radius))
    }

    pub fn plan(
        &self,
        mode: &LayoutMode,
        bounding_radius: f64,
        assignments: &[MarkerAssignment],
    ) -> Result<PagePlan, Error> {
        layout::plan(mode, bounding_radius, assignments)
    }

    pub fn validate(&self, padding: f64, bounding_radius: f64) -> Vec<Advisory> {
        validate::check_overlap(padding, bounding_radius)
    }

    /// Validate, assign, and lay out a whole run.
    ///
    /// Fails on the first fatal condition; nothing partial is returned.
    pub fn prepare(&self, config: &TargetConfig) -> Result<Prepared, Error> {
        config.validate()?;
        let assignments = self.assign(config.bits, config.markers, config.start_number)?;
        let geometry = self.geometry_for(config.bits, config.dot_radius)?;
        let mode = config.layout_mode()?;
        let plan = self.plan(&mode, geometry.bounding_radius, &assignments)?;
        let mut advisories = validate::check_layout(&mode, geometry.bounding_radius);
        if let LayoutMode::Grid(spec) = &mode {
            advisories.extend(validate::check_calibration(spec.margin, config.cal_dot_radius));
        }
        for advisory in &advisories {
            log::warn!("{advisory}");
        }
        log::info!(
            "{} markers ({} bits) on {} page(s)",
            assignments.len(),
            config.bits,
            plan.pages.len()
        );

        Ok(Prepared {
            config: config.clone(),
            geometry,
            mode,
            assignments,
            plan,
            advisories,
        })
    }
}
