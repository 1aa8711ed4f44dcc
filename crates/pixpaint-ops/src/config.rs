//! Tunable engine settings.
//!
//! All fields have defaults, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! filter:
//!   diameter: 9
//!   sigma_color: 40.0
//! raster:
//!   line_spacing: 10
//! ```
//!
//! ```rust
//! use pixpaint_ops::config::EngineConfig;
//!
//! let cfg = EngineConfig::from_yaml_str("raster:\n  line_spacing: 10\n").unwrap();
//! assert_eq!(cfg.raster.line_spacing, 10);
//! assert_eq!(cfg.filter.diameter, 7);
//! ```

use crate::bilateral::{FilterParams, DEFAULT_DIAMETER, DEFAULT_SIGMA_COLOR, DEFAULT_SIGMA_SPACE};
use crate::enlarge::{check_scale, DEFAULT_ENLARGE_SCALE};
use crate::gesture::EnlargeTool;
use crate::raster::{Rasterizer, DEFAULT_LINE_SPACING};
use crate::OpsResult;
use pixpaint_core::Point;
use serde::{Deserialize, Serialize};

/// Bilateral filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Window diameter; must be odd.
    pub diameter: u32,
    /// Color-distance sigma.
    pub sigma_color: f64,
    /// Spatial-distance sigma.
    pub sigma_space: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_DIAMETER,
            sigma_color: DEFAULT_SIGMA_COLOR,
            sigma_space: DEFAULT_SIGMA_SPACE,
        }
    }
}

/// Shape rasterizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterConfig {
    /// Distance between pattern lines.
    pub line_spacing: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

/// Paint-bucket settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillConfig {
    /// Column sampled for the fill target color.
    pub reference_x: i32,
    /// Row sampled for the fill target color.
    pub reference_y: i32,
}

/// Enlarge tool settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnlargeConfig {
    /// Magnification factor.
    pub scale: f64,
}

impl Default for EnlargeConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_ENLARGE_SCALE,
        }
    }
}

/// Every tunable of the engines.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Bilateral filter.
    pub filter: FilterConfig,
    /// Shape rasterizer.
    pub raster: RasterConfig,
    /// Flood fill.
    pub fill: FillConfig,
    /// Enlarge tool.
    pub enlarge: EnlargeConfig,
}

impl EngineConfig {
    /// Parses YAML and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OpsError::Config`] for malformed YAML or unknown
    /// keys, and [`crate::OpsError::InvalidParameter`] for out-of-range
    /// values.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serializes to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OpsError::Config`] if serialization fails.
    pub fn to_yaml_string(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OpsError::InvalidParameter`] naming the first bad
    /// field.
    pub fn validate(&self) -> OpsResult<()> {
        self.filter_params()?;
        self.rasterizer()?;
        check_scale(self.enlarge.scale)
    }

    /// Validated bilateral parameters.
    pub fn filter_params(&self) -> OpsResult<FilterParams> {
        FilterParams::new(
            self.filter.diameter,
            self.filter.sigma_color,
            self.filter.sigma_space,
        )
    }

    /// Validated rasterizer.
    pub fn rasterizer(&self) -> OpsResult<Rasterizer> {
        Rasterizer::new(self.raster.line_spacing)
    }

    /// Coordinate sampled for the paint-bucket target.
    pub fn fill_reference(&self) -> Point {
        Point::new(self.fill.reference_x, self.fill.reference_y)
    }

    /// Enlarge tool with the configured scale.
    pub fn enlarge_tool(&self) -> OpsResult<EnlargeTool> {
        EnlargeTool::new(self.enlarge.scale)
    }
}
