//! Run configuration with the defaults of the classic target sheet.

use std::fmt;
use std::str::FromStr;

use crate::codeset::BitWidth;
use crate::error::ConfigError;
use crate::layout::{FixedGrid, GridSpec, LayoutMode, PageSize};

pub const DEFAULT_DOT_RADIUS_MM: f64 = 3.0;
pub const DEFAULT_BITS: u32 = 8;
pub const DEFAULT_MARKERS: usize = 12;
pub const DEFAULT_START_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_MARGIN_MM: f64 = 10.0;
pub const DEFAULT_MARKER_PADDING_MM: f64 = 5.0;
pub const DEFAULT_CAL_DOT_RADIUS_MM: f64 = 2.0;
pub const DEFAULT_CAL_DOT_SPACING_MM: f64 = 20.0;
pub const DEFAULT_CAL_LABEL: &str = "20.00 mm calibration reference";

/// Target page format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sheet {
    /// 63-up round label sheet with fixed slot positions.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "avery-6450"))]
    Avery6450,
    #[cfg_attr(feature = "serde", serde(rename = "letter"))]
    Letter,
    #[cfg_attr(feature = "serde", serde(rename = "a4"))]
    A4,
    #[cfg_attr(feature = "serde", serde(rename = "a3"))]
    A3,
    /// Computed grid on `page_width` x `page_height`.
    #[cfg_attr(feature = "serde", serde(rename = "custom"))]
    Custom,
}

impl Sheet {
    pub const ALL: [Sheet; 5] = [
        Sheet::Avery6450,
        Sheet::Letter,
        Sheet::A4,
        Sheet::A3,
        Sheet::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sheet::Avery6450 => "avery-6450",
            Sheet::Letter => "letter",
            Sheet::A4 => "a4",
            Sheet::A3 => "a3",
            Sheet::Custom => "custom",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sheet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Sheet, ConfigError> {
        let lower = s.trim().to_ascii_lowercase();
        Sheet::ALL
            .into_iter()
            .find(|sheet| sheet.name() == lower)
            .ok_or_else(|| ConfigError::UnknownSheet(s.to_string()))
    }
}

/// Everything needed to produce one set of target pages.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct TargetConfig {
    /// Center dot radius in mm.
    pub dot_radius: f64,
    /// Ring bits.
    pub bits: u32,
    /// Number of markers to generate.
    pub markers: usize,
    /// Number printed on the first marker.
    pub start_number: u32,
    pub margin: f64,
    pub padding: f64,
    pub cal_dot_radius: f64,
    /// Center-to-center distance of the calibration dots.
    pub cal_spacing: f64,
    pub cal_label: String,
    pub sheet: Sheet,
    pub page_width: Option<f64>,
    pub page_height: Option<f64>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            dot_radius: DEFAULT_DOT_RADIUS_MM,
            bits: DEFAULT_BITS,
            markers: DEFAULT_MARKERS,
            start_number: DEFAULT_START_NUMBER,
            margin: DEFAULT_PAGE_MARGIN_MM,
            padding: DEFAULT_MARKER_PADDING_MM,
            cal_dot_radius: DEFAULT_CAL_DOT_RADIUS_MM,
            cal_spacing: DEFAULT_CAL_DOT_SPACING_MM,
            cal_label: DEFAULT_CAL_LABEL.to_string(),
            sheet: Sheet::default(),
            page_width: None,
            page_height: None,
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

impl TargetConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<TargetConfig, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject configurations no run could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("dot radius", self.dot_radius)?;
        BitWidth::new(self.bits)?;
        if self.markers < 1 {
            return Err(ConfigError::NoMarkers);
        }
        positive("page margin", self.margin)?;
        positive("marker padding", self.padding)?;
        positive("calibration dot radius", self.cal_dot_radius)?;
        positive("calibration dot spacing", self.cal_spacing)?;
        if self.sheet == Sheet::Custom {
            let (w, h) = self.custom_page()?;
            positive("page width", w)?;
            positive("page height", h)?;
        }
        Ok(())
    }

    pub fn bit_width(&self) -> Result<BitWidth, ConfigError> {
        BitWidth::new(self.bits)
    }

    fn custom_page(&self) -> Result<(f64, f64), ConfigError> {
        match (self.page_width, self.page_height) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(ConfigError::MissingPageSize),
        }
    }

    /// Resolve the sheet into a layout mode.
    pub fn layout_mode(&self) -> Result<LayoutMode, ConfigError> {
        let page = match self.sheet {
            Sheet::Avery6450 => return Ok(LayoutMode::FixedGrid(FixedGrid::avery_6450())),
            Sheet::Letter => PageSize::LETTER,
            Sheet::A4 => PageSize::A4,
            Sheet::A3 => PageSize::A3,
            Sheet::Custom => {
                let (w, h) = self.custom_page()?;
                PageSize::new(w, h)
            }
        };
        Ok(LayoutMode::Grid(GridSpec {
            page,
            margin: self.margin,
            padding: self.padding,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TargetConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.bits, 8);
        assert_eq!(config.markers, 12);
        assert_eq!(config.sheet, Sheet::Avery6450);
    }

    #[test]
    fn rejects_bad_values() {
        let cases: Vec<(fn(&mut TargetConfig), &str)> = vec![
            (|c| c.dot_radius = 0.0, "positive"),
            (|c| c.dot_radius = -1.0, "positive"),
            (|c| c.bits = 3, "between 4 and 16"),
            (|c| c.bits = 17, "between 4 and 16"),
            (|c| c.markers = 0, "at least 1"),
            (|c| c.margin = 0.0, "margin"),
            (|c| c.padding = -1.0, "padding"),
            (|c| c.cal_dot_radius = 0.0, "calibration dot radius"),
            (|c| c.cal_spacing = 0.0, "spacing"),
        ];
        for (tweak, needle) in cases {
            let mut config = TargetConfig::default();
            tweak(&mut config);
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains(needle), "{err:?} should mention {needle:?}");
        }
    }

    #[test]
    fn custom_sheet_needs_dimensions() {
        let mut config = TargetConfig {
            sheet: Sheet::Custom,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MissingPageSize));
        config.page_width = Some(100.0);
        config.page_height = Some(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "page height", .. })
        ));
        config.page_height = Some(150.0);
        assert_eq!(config.validate(), Ok(()));
        match config.layout_mode().unwrap() {
            LayoutMode::Grid(spec) => assert_eq!(spec.page, PageSize::new(100.0, 150.0)),
            other => panic!("expected grid, got {other:?}"),
        }
    }

    #[test]
    fn sheet_names_round_trip_through_from_str() {
        for sheet in Sheet::ALL {
            assert_eq!(sheet.name().parse::<Sheet>().unwrap(), sheet);
        }
        assert_eq!("A4".parse::<Sheet>().unwrap(), Sheet::A4);
        assert!("tabloid".parse::<Sheet>().is_err());
    }

    #[test]
    fn avery_sheet_is_fixed_grid() {
        let mode = TargetConfig::default().layout_mode().unwrap();
        assert!(matches!(mode, LayoutMode::FixedGrid(ref g) if g.capacity() == 63));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parse_toml_with_defaults() {
        let config = TargetConfig::from_toml_str(
            r#"
            bits = 10
            markers = 40
            sheet = "a4"
            padding = 15.0
            "#,
        )
        .unwrap();
        assert_eq!(config.bits, 10);
        assert_eq!(config.markers, 40);
        assert_eq!(config.sheet, Sheet::A4);
        assert_eq!(config.dot_radius, DEFAULT_DOT_RADIUS_MM);
        assert_eq!(config.cal_label, DEFAULT_CAL_LABEL);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parse_toml_rejects_unknown_keys() {
        let err = TargetConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
