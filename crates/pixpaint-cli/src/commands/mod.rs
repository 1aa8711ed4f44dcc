//! CLI command implementations

pub mod blank;
pub mod denoise;
pub mod enlarge;
pub mod fill;
pub mod insert;
pub mod shape;

use anyhow::{Context, Result};
use pixpaint_core::{PixelBuffer, Point};
use pixpaint_ops::EngineConfig;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    crate::codec::read_png(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    crate::codec::write_png(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Loads engine settings, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    EngineConfig::from_yaml_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
}

/// Parses `X,Y` into a point.
pub fn parse_point(s: &str) -> std::result::Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("bad coordinate '{}': {e}", v.trim()))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}
