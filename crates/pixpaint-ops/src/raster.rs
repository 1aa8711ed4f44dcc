//! Shape rasterization: outlines plus line-pattern fills.
//!
//! # Rules
//!
//! - Rectangle outline: the four boundary lines of the box between the two
//!   corners, each widened to a band of offsets `-(w-1)/2 ..= w/2`.
//! - Circle outline: every pixel whose distance `d` from the center has
//!   `|d - r| <= w/2`.
//! - Horizontal pattern: rows `top + k·spacing` strictly above the bottom
//!   edge. Vertical pattern: columns `left + k·spacing` strictly left of the
//!   right edge. Rectangles get full-width lines; circles only the pixels
//!   inside the circle.
//! - Pattern thickness is `max(1, w/2)`, centered on the line and clipped
//!   to the shape extent.
//!
//! Every write is clipped to the buffer, so shapes may hang off any edge.
//!
//! # Example
//!
//! ```rust
//! use pixpaint_core::{PixelBuffer, Point, Rgba8};
//! use pixpaint_ops::raster::Rasterizer;
//! use pixpaint_ops::shape::{FillPattern, Shape};
//!
//! let mut canvas = PixelBuffer::blank(200, 200);
//! let shape = Shape::rectangle(Point::new(10, 10), Point::new(150, 120), Rgba8::BLACK)
//!     .with_pattern(FillPattern::HorizontalLines);
//! Rasterizer::default().draw(&mut canvas, &shape);
//! assert_eq!(canvas.pixel(80, 35), Rgba8::BLACK);
//! ```

use crate::shape::{FillPattern, Shape, ShapeGeometry};
use crate::{OpsError, OpsResult};
use pixpaint_core::{PixelBuffer, Point, Rgba8};
use tracing::trace;

/// Default distance between pattern lines.
pub const DEFAULT_LINE_SPACING: u32 = 25;

/// Draws [`Shape`]s into pixel buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rasterizer {
    line_spacing: u32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

impl Rasterizer {
    /// Creates a rasterizer with the given pattern line spacing.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] if `line_spacing` is 0.
    pub fn new(line_spacing: u32) -> OpsResult<Self> {
        if line_spacing == 0 {
            return Err(OpsError::InvalidParameter("line_spacing must be > 0".into()));
        }
        Ok(Self { line_spacing })
    }

    /// Distance between pattern lines.
    pub fn line_spacing(&self) -> u32 {
        self.line_spacing
    }

    /// Draws the outline of `shape`, then its pattern.
    pub fn draw(&self, buf: &mut PixelBuffer, shape: &Shape) {
        trace!(%shape, "rasterize");
        let width = shape.line_width.max(1);
        match shape.geometry {
            ShapeGeometry::Rectangle { .. } => {
                let (min, max) = shape.extent();
                stroke_rect(buf, min, max, width, shape.stroke);
                self.rect_pattern(buf, min, max, width, shape);
            }
            ShapeGeometry::Circle { center, radius } => {
                let radius = radius.max(0);
                stroke_circle(buf, center, radius, width, shape.stroke);
                self.circle_pattern(buf, center, radius, width, shape);
            }
        }
    }

    fn rect_pattern(&self, buf: &mut PixelBuffer, min: Point, max: Point, width: u32, shape: &Shape) {
        let (lo, hi) = band(pattern_thickness(width));
        let (left, top, right, bottom) = (min.x as i64, min.y as i64, max.x as i64, max.y as i64);
        match shape.pattern {
            FillPattern::None => {}
            FillPattern::HorizontalLines => {
                for row in self.positions(top, bottom, (lo, hi), buf.height()) {
                    let (y0, y1) = clip_range((row + lo).max(top), (row + hi).min(bottom), buf.height());
                    for y in y0..=y1 {
                        span(buf, left, right, y, shape.stroke);
                    }
                }
            }
            FillPattern::VerticalLines => {
                for col in self.positions(left, right, (lo, hi), buf.width()) {
                    let (x0, x1) = clip_range((col + lo).max(left), (col + hi).min(right), buf.width());
                    for x in x0..=x1 {
                        column(buf, x, top, bottom, shape.stroke);
                    }
                }
            }
        }
    }

    fn circle_pattern(&self, buf: &mut PixelBuffer, center: Point, radius: i32, width: u32, shape: &Shape) {
        let (lo, hi) = band(pattern_thickness(width));
        let (cx, cy, r) = (center.x as i64, center.y as i64, radius as i64);
        let (top, bottom, left, right) = (cy - r, cy + r, cx - r, cx + r);
        match shape.pattern {
            FillPattern::None => {}
            FillPattern::HorizontalLines => {
                let (x0, x1) = clip_range(left, right, buf.width());
                for row in self.positions(top, bottom, (lo, hi), buf.height()) {
                    let (y0, y1) = clip_range((row + lo).max(top), (row + hi).min(bottom), buf.height());
                    for y in y0..=y1 {
                        for x in x0..=x1 {
                            if is_inside_circle(x, y, cx, cy, r) {
                                buf.put_clipped(x, y, shape.stroke);
                            }
                        }
                    }
                }
            }
            FillPattern::VerticalLines => {
                let (y0, y1) = clip_range(top, bottom, buf.height());
                for col in self.positions(left, right, (lo, hi), buf.width()) {
                    let (x0, x1) = clip_range((col + lo).max(left), (col + hi).min(right), buf.width());
                    for x in x0..=x1 {
                        for y in y0..=y1 {
                            if is_inside_circle(x, y, cx, cy, r) {
                                buf.put_clipped(x, y, shape.stroke);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Line positions `start + k·spacing` with position < `end`, limited to
    /// lines whose `(lo, hi)` band touches `[0, limit)`.
    ///
    /// The phase stays anchored at `start`, so clipping never shifts a line.
    fn positions(&self, start: i64, end: i64, (lo, hi): (i64, i64), limit: u32) -> impl Iterator<Item = i64> {
        let step = self.line_spacing as i64;
        let visible_from = -hi;
        let first = if start >= visible_from {
            start
        } else {
            start + (visible_from - start + step - 1) / step * step
        };
        let last = end.min(limit as i64 - lo);
        (first..last.max(first)).step_by(self.line_spacing as usize)
    }
}

/// Returns `true` if (px, py) is within Euclidean distance `r` of (cx, cy).
#[inline]
pub fn is_inside_circle(px: i64, py: i64, cx: i64, cy: i64, r: i64) -> bool {
    let (dx, dy) = (px - cx, py - cy);
    dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)) <= r.saturating_mul(r)
}

/// Draws the outline of the box between `min` and `max` (inclusive).
pub fn stroke_rect(buf: &mut PixelBuffer, min: Point, max: Point, width: u32, color: Rgba8) {
    let (lo, hi) = band(width);
    let (x0, y0, x1, y1) = (min.x as i64, min.y as i64, max.x as i64, max.y as i64);
    for edge in [y0, y1] {
        let (from, to) = clip_range(edge + lo, edge + hi, buf.height());
        for y in from..=to {
            span(buf, x0 + lo, x1 + hi, y, color);
        }
    }
    for edge in [x0, x1] {
        let (from, to) = clip_range(edge + lo, edge + hi, buf.width());
        for x in from..=to {
            column(buf, x, y0 + lo, y1 + hi, color);
        }
    }
}

/// Draws every pixel with `|d - radius| <= width / 2`.
pub fn stroke_circle(buf: &mut PixelBuffer, center: Point, radius: i32, width: u32, color: Rgba8) {
    if buf.is_empty() {
        return;
    }
    let half = width as f64 / 2.0;
    let r = radius.max(0) as f64;
    let reach = radius.max(0) as i64 + width as i64;
    let (cx, cy) = (center.x as i64, center.y as i64);
    let (x0, x1) = clip_range(cx - reach, cx + reach, buf.width());
    let (y0, y1) = clip_range(cy - reach, cy + reach, buf.height());

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);
            let d = (dx * dx + dy * dy).sqrt();
            if (d - r).abs() <= half {
                buf.put_clipped(x, y, color);
            }
        }
    }
}

/// Pattern line thickness for a given outline width.
#[inline]
pub fn pattern_thickness(line_width: u32) -> u32 {
    (line_width / 2).max(1)
}

/// Offsets `-(w-1)/2 ..= w/2` of a band `w` pixels wide centered on a line.
#[inline]
fn band(width: u32) -> (i64, i64) {
    let w = width.max(1) as i64;
    (-((w - 1) / 2), w / 2)
}

/// Clamps `[from, to]` to `[0, limit - 1]`. Yields an empty range
/// (`from > to`) when nothing is visible.
#[inline]
fn clip_range(from: i64, to: i64, limit: u32) -> (i64, i64) {
    (from.max(0), to.min(limit as i64 - 1))
}

fn span(buf: &mut PixelBuffer, x0: i64, x1: i64, y: i64, color: Rgba8) {
    if y < 0 || y >= buf.height() as i64 {
        return;
    }
    let (x0, x1) = clip_range(x0, x1, buf.width());
    for x in x0..=x1 {
        buf.put_clipped(x, y, color);
    }
}

fn column(buf: &mut PixelBuffer, x: i64, y0: i64, y1: i64, color: Rgba8) {
    if x < 0 || x >= buf.width() as i64 {
        return;
    }
    let (y0, y1) = clip_range(y0, y1, buf.height());
    for y in y0..=y1 {
        buf.put_clipped(x, y, color);
    }
}
