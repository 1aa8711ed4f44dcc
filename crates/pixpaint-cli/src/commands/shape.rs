//! Rect and circle commands
//!
//! Each command replays a press-drag-release gesture on a shape tool, so
//! the result is exactly what the interactive tool would commit.

use crate::{CircleArgs, RectArgs, StrokeArgs};
use anyhow::{Context, Result};
use pixpaint_core::{PixelBuffer, Point};
use pixpaint_ops::{EngineConfig, Rasterizer, ShapeKind, ShapeTool};
use std::path::Path;
use tracing::{info, trace};

pub fn run_rect(args: RectArgs, config: &EngineConfig, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), from = %args.from, to = %args.to, "rect::run");
    draw(
        &args.input,
        &args.output,
        ShapeKind::Rectangle,
        args.from,
        args.to,
        &args.stroke,
        config,
        verbose,
    )
}

pub fn run_circle(args: CircleArgs, config: &EngineConfig, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), center = %args.center, to = %args.to, "circle::run");
    draw(
        &args.input,
        &args.output,
        ShapeKind::Circle,
        args.center,
        args.to,
        &args.stroke,
        config,
        verbose,
    )
}

fn rasterizer(stroke: &StrokeArgs, config: &EngineConfig) -> Result<Rasterizer> {
    match stroke.spacing {
        Some(spacing) => Rasterizer::new(spacing).context("Invalid --spacing"),
        None => Ok(config.rasterizer()?),
    }
}

#[allow(clippy::too_many_arguments)]
fn draw(
    input: &Path,
    output: &Path,
    kind: ShapeKind,
    start: Point,
    end: Point,
    stroke: &StrokeArgs,
    config: &EngineConfig,
    verbose: u8,
) -> Result<()> {
    let mut image: PixelBuffer = super::load_image(input)?;
    let mut tool = ShapeTool::new(kind, rasterizer(stroke, config)?)
        .with_stroke(stroke.color)
        .with_pattern(stroke.pattern)
        .with_line_width(stroke.width);

    tool.pointer_down(start, &image);
    tool.pointer_move(end);
    let shape = tool
        .pointer_up(end, &mut image)
        .context("shape gesture did not commit")?;
    info!(%shape, "Drew shape");

    if verbose > 0 {
        println!("Drew {shape}");
    }

    super::save_image(output, &image)
}
