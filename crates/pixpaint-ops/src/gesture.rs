//! Pointer-gesture state machines for the drawing tools.
//!
//! Each tool moves through [`GesturePhase`]s:
//!
//! ```text
//!         pointer_down           pointer_up
//!  Idle ───────────────► Dragging ─────────► Committing ──► Idle
//!   ▲                      │  ▲                  (draw into canvas,
//!   │        cancel()      │  │ pointer_move      clear preview)
//!   └──────────────────────┘  └─ (redraw preview)
//! ```
//!
//! While dragging, the tool renders into its own transparent scratch
//! buffer (the preview). The preview is cleared and fully redrawn on every
//! move and never touches the canvas. Only the commit on pointer up writes
//! to the canonical buffer, which the caller lends for that call alone.
//!
//! ```rust
//! use pixpaint_core::{PixelBuffer, Point, Rgba8};
//! use pixpaint_ops::gesture::{GesturePhase, ShapeTool};
//! use pixpaint_ops::raster::Rasterizer;
//! use pixpaint_ops::shape::ShapeKind;
//!
//! let mut canvas = PixelBuffer::blank(64, 64);
//! let mut tool = ShapeTool::new(ShapeKind::Circle, Rasterizer::default());
//!
//! tool.pointer_down(Point::new(32, 32), &canvas);
//! tool.pointer_move(Point::new(40, 32));
//! assert_eq!(tool.phase(), GesturePhase::Dragging);
//! assert_eq!(canvas, PixelBuffer::blank(64, 64));
//!
//! let shape = tool.pointer_up(Point::new(42, 30), &mut canvas).unwrap();
//! assert_eq!(tool.phase(), GesturePhase::Idle);
//! assert_eq!(canvas.pixel(42, 32), Rgba8::BLACK);
//! # let _ = shape;
//! ```

use crate::enlarge::{check_scale, enlarge_region, DEFAULT_ENLARGE_SCALE};
use crate::raster::{stroke_rect, Rasterizer};
use crate::shape::{FillPattern, Shape, ShapeKind};
use crate::OpsResult;
use pixpaint_core::{PixelBuffer, Point, Rect, Rgba8};
use tracing::{debug, trace};

/// Where a tool is in its gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GesturePhase {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer is down; the preview tracks the pointer.
    Dragging,
    /// Pointer released; the result is being written to the canvas.
    ///
    /// Only held inside `pointer_up`, which returns with the tool back in
    /// [`Idle`](GesturePhase::Idle), so [`ShapeTool::phase`] and
    /// [`EnlargeTool::phase`] never report it. Commit log events carry it.
    Committing,
}

/// Resets `preview` to a transparent buffer the size of `canvas`.
fn reset_preview(preview: &mut PixelBuffer, canvas: &PixelBuffer) {
    if preview.dimensions() == canvas.dimensions() {
        preview.clear(Rgba8::TRANSPARENT);
    } else {
        *preview = PixelBuffer::new(canvas.width(), canvas.height());
    }
}

/// Rectangle or circle drawing tool.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ShapeKind,
    stroke: Rgba8,
    pattern: FillPattern,
    line_width: u32,
    rasterizer: Rasterizer,
    phase: GesturePhase,
    shape: Option<Shape>,
    preview: PixelBuffer,
}

impl ShapeTool {
    /// Creates an idle tool drawing black 1px outlines with no pattern.
    pub fn new(kind: ShapeKind, rasterizer: Rasterizer) -> Self {
        Self {
            kind,
            stroke: Rgba8::BLACK,
            pattern: FillPattern::None,
            line_width: 1,
            rasterizer,
            phase: GesturePhase::Idle,
            shape: None,
            preview: PixelBuffer::new(0, 0),
        }
    }

    /// Sets the stroke color for the next gesture.
    pub fn with_stroke(mut self, stroke: Rgba8) -> Self {
        self.stroke = stroke;
        self
    }

    /// Sets the fill pattern for the next gesture.
    pub fn with_pattern(mut self, pattern: FillPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Sets the line width for the next gesture (0 is treated as 1).
    pub fn with_line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width.max(1);
        self
    }

    /// Current phase.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// The shape being dragged, if any.
    pub fn current(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// The scratch preview buffer.
    pub fn preview(&self) -> &PixelBuffer {
        &self.preview
    }

    /// Starts a gesture at `p`. A gesture already in progress is dropped.
    ///
    /// `canvas` only sizes the preview; it is not modified.
    pub fn pointer_down(&mut self, p: Point, canvas: &PixelBuffer) {
        reset_preview(&mut self.preview, canvas);
        let shape = Shape::start(self.kind, p, self.stroke)
            .with_pattern(self.pattern)
            .with_line_width(self.line_width);
        trace!(%p, kind = ?self.kind, "shape gesture start");
        self.shape = Some(shape);
        self.phase = GesturePhase::Dragging;
    }

    /// Updates the shape and redraws the preview. Returns the preview, or
    /// `None` when no gesture is in progress.
    pub fn pointer_move(&mut self, p: Point) -> Option<&PixelBuffer> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }
        let shape = self.shape.as_mut()?;
        shape.drag_to(p);
        self.preview.clear(Rgba8::TRANSPARENT);
        self.rasterizer.draw(&mut self.preview, shape);
        Some(&self.preview)
    }

    /// Finishes the gesture at `p`, draws the shape into `canvas`, clears
    /// the preview and returns the committed shape. Returns `None` (and
    /// leaves `canvas` alone) when no gesture is in progress.
    pub fn pointer_up(&mut self, p: Point, canvas: &mut PixelBuffer) -> Option<Shape> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }
        let mut shape = self.shape.take()?;
        shape.drag_to(p);

        self.phase = GesturePhase::Committing;
        trace!(phase = ?self.phase, %shape, "rasterize into canvas");
        self.rasterizer.draw(canvas, &shape);
        self.preview.clear(Rgba8::TRANSPARENT);
        self.phase = GesturePhase::Idle;

        debug!(%shape, "shape committed");
        Some(shape)
    }

    /// Abandons the gesture without touching the canvas.
    pub fn cancel(&mut self) {
        self.shape = None;
        self.preview.clear(Rgba8::TRANSPARENT);
        self.phase = GesturePhase::Idle;
    }
}

/// Select-and-magnify tool.
#[derive(Debug, Clone)]
pub struct EnlargeTool {
    scale: f64,
    outline: Rgba8,
    phase: GesturePhase,
    anchor: Point,
    cursor: Point,
    preview: PixelBuffer,
}

impl Default for EnlargeTool {
    fn default() -> Self {
        Self {
            scale: DEFAULT_ENLARGE_SCALE,
            outline: Rgba8::BLACK,
            phase: GesturePhase::Idle,
            anchor: Point::default(),
            cursor: Point::default(),
            preview: PixelBuffer::new(0, 0),
        }
    }
}

impl EnlargeTool {
    /// Creates an idle tool magnifying by `scale`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OpsError::InvalidParameter`] unless `scale` is
    /// finite and > 0.
    pub fn new(scale: f64) -> OpsResult<Self> {
        check_scale(scale)?;
        Ok(Self {
            scale,
            ..Self::default()
        })
    }

    /// Sets the color of the selection outline drawn in the preview.
    pub fn with_outline(mut self, outline: Rgba8) -> Self {
        self.outline = outline;
        self
    }

    /// Magnification factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current phase.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// The scratch preview buffer.
    pub fn preview(&self) -> &PixelBuffer {
        &self.preview
    }

    /// The selection as it would commit now, clipped to the preview size.
    pub fn selection(&self) -> Option<Rect> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }
        Rect::from_points_clipped(
            self.anchor,
            self.cursor,
            self.preview.width(),
            self.preview.height(),
        )
    }

    /// Starts a selection at `p`.
    pub fn pointer_down(&mut self, p: Point, canvas: &PixelBuffer) {
        reset_preview(&mut self.preview, canvas);
        self.anchor = p;
        self.cursor = p;
        self.phase = GesturePhase::Dragging;
        trace!(%p, "enlarge gesture start");
    }

    /// Updates the selection and redraws its outline in the preview.
    pub fn pointer_move(&mut self, p: Point) -> Option<&PixelBuffer> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }
        self.cursor = p;
        self.preview.clear(Rgba8::TRANSPARENT);
        let min = Point::new(self.anchor.x.min(p.x), self.anchor.y.min(p.y));
        let max = Point::new(self.anchor.x.max(p.x), self.anchor.y.max(p.y));
        stroke_rect(&mut self.preview, min, max, 1, self.outline);
        Some(&self.preview)
    }

    /// Finishes the selection at `p` and magnifies it in `canvas`.
    ///
    /// Returns the clipped selection that was enlarged, or `None` when no
    /// gesture was in progress or the selection is empty.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`enlarge_region`].
    pub fn pointer_up(&mut self, p: Point, canvas: &mut PixelBuffer) -> OpsResult<Option<Rect>> {
        if self.phase != GesturePhase::Dragging {
            return Ok(None);
        }
        self.cursor = p;
        self.phase = GesturePhase::Committing;

        let selection = Rect::from_points_clipped(self.anchor, p, canvas.width(), canvas.height());
        trace!(phase = ?self.phase, ?selection, "enlarge into canvas");
        let result = match selection {
            Some(sel) => enlarge_region(canvas, sel, self.scale).map(|()| Some(sel)),
            None => Ok(None),
        };

        self.preview.clear(Rgba8::TRANSPARENT);
        self.phase = GesturePhase::Idle;
        debug!(?selection, scale = self.scale, "enlarge committed");
        result
    }

    /// Abandons the selection.
    pub fn cancel(&mut self) {
        self.preview.clear(Rgba8::TRANSPARENT);
        self.phase = GesturePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_count(buf: &PixelBuffer) -> usize {
        buf.pixels().filter(|(_, _, p)| !p.is_transparent()).count()
    }

    #[test]
    fn test_idle_events_are_noops() {
        let mut canvas = PixelBuffer::blank(16, 16);
        let mut tool = ShapeTool::new(ShapeKind::Rectangle, Rasterizer::default());
        assert!(tool.pointer_move(Point::new(3, 3)).is_none());
        assert!(tool.pointer_up(Point::new(3, 3), &mut canvas).is_none());
        assert_eq!(tool.phase(), GesturePhase::Idle);
        assert_eq!(canvas, PixelBuffer::blank(16, 16));
    }

    #[test]
    fn test_preview_redrawn_each_move() {
        let canvas = PixelBuffer::blank(50, 50);
        let mut tool = ShapeTool::new(ShapeKind::Rectangle, Rasterizer::default());
        tool.pointer_down(Point::new(5, 5), &canvas);
        assert_eq!(tool.preview().dimensions(), (50, 50));

        tool.pointer_move(Point::new(40, 40));
        let big = opaque_count(tool.preview());

        let preview = tool.pointer_move(Point::new(10, 10)).unwrap();
        // Box 5..=10: 6 per edge, corners shared.
        assert_eq!(opaque_count(preview), 4 * 6 - 4);
        assert!(big > opaque_count(preview));
        assert!(preview.pixel(40, 40).is_transparent());
        assert_eq!(canvas, PixelBuffer::blank(50, 50));
    }

    #[test]
    fn test_commit_draws_and_clears_preview() {
        let mut canvas = PixelBuffer::blank(40, 40);
        let mut tool = ShapeTool::new(ShapeKind::Rectangle, Rasterizer::default())
            .with_stroke(Rgba8::RED)
            .with_line_width(2);
        tool.pointer_down(Point::new(30, 30), &canvas);
        tool.pointer_move(Point::new(20, 20));
        let shape = tool.pointer_up(Point::new(5, 8), &mut canvas).unwrap();

        assert_eq!(shape.extent(), (Point::new(5, 8), Point::new(30, 30)));
        assert_eq!(shape.line_width, 2);
        assert_eq!(canvas.pixel(5, 8), Rgba8::RED);
        assert_eq!(canvas.pixel(30, 30), Rgba8::RED);
        assert_eq!(opaque_count(tool.preview()), 0);
        assert_eq!(tool.phase(), GesturePhase::Idle);
        assert!(tool.current().is_none());
    }

    #[test]
    fn test_circle_commit_uses_chebyshev_radius() {
        let mut canvas = PixelBuffer::blank(40, 40);
        let mut tool = ShapeTool::new(ShapeKind::Circle, Rasterizer::default());
        tool.pointer_down(Point::new(20, 20), &canvas);
        let shape = tool.pointer_up(Point::new(23, 11), &mut canvas).unwrap();
        assert_eq!(shape.extent(), (Point::new(11, 11), Point::new(29, 29)));
        assert_eq!(canvas.pixel(20, 11), Rgba8::BLACK);
    }

    #[test]
    fn test_far_circle_drag_does_not_overflow() {
        let mut canvas = PixelBuffer::blank(16, 16);
        let mut tool = ShapeTool::new(ShapeKind::Circle, Rasterizer::default())
            .with_pattern(FillPattern::HorizontalLines);
        tool.pointer_down(Point::new(i32::MAX, 0), &canvas);
        tool.pointer_move(Point::new(-1, 0)).unwrap();
        let shape = tool.pointer_up(Point::new(-1, 0), &mut canvas).unwrap();
        assert_eq!(
            shape.geometry,
            crate::shape::ShapeGeometry::Circle {
                center: Point::new(i32::MAX, 0),
                radius: i32::MAX
            }
        );
        assert_eq!(tool.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_cancel() {
        let mut canvas = PixelBuffer::blank(20, 20);
        let mut tool = ShapeTool::new(ShapeKind::Circle, Rasterizer::default());
        tool.pointer_down(Point::new(10, 10), &canvas);
        tool.pointer_move(Point::new(15, 10));
        tool.cancel();
        assert_eq!(tool.phase(), GesturePhase::Idle);
        assert_eq!(opaque_count(tool.preview()), 0);
        assert!(tool.pointer_up(Point::new(15, 10), &mut canvas).is_none());
        assert_eq!(canvas, PixelBuffer::blank(20, 20));
    }

    #[test]
    fn test_preview_follows_canvas_size() {
        let mut tool = ShapeTool::new(ShapeKind::Rectangle, Rasterizer::default());
        tool.pointer_down(Point::new(0, 0), &PixelBuffer::blank(10, 10));
        tool.cancel();
        tool.pointer_down(Point::new(0, 0), &PixelBuffer::blank(30, 12));
        assert_eq!(tool.preview().dimensions(), (30, 12));
    }

    #[test]
    fn test_enlarge_tool_commit() {
        let mut canvas = PixelBuffer::blank(32, 32);
        for y in 0..32 {
            for x in 0..32 {
                canvas.set_pixel(x, y, Rgba8::opaque(x as u8 * 8, y as u8 * 8, 0));
            }
        }
        let mut expected = canvas.clone();
        enlarge_region(&mut expected, Rect::new(4, 6, 20, 14), 1.5).unwrap();

        let mut tool = EnlargeTool::default();
        tool.pointer_down(Point::new(24, 20), &canvas);
        let preview = tool.pointer_move(Point::new(10, 10)).unwrap();
        assert_eq!(preview.pixel(10, 10), Rgba8::BLACK);
        assert_eq!(tool.selection(), Some(Rect::new(10, 10, 14, 10)));

        let sel = tool.pointer_up(Point::new(4, 6), &mut canvas).unwrap();
        assert_eq!(sel, Some(Rect::new(4, 6, 20, 14)));
        assert_eq!(canvas, expected);
        assert_eq!(tool.phase(), GesturePhase::Idle);
        assert_eq!(opaque_count(tool.preview()), 0);
    }

    #[test]
    fn test_enlarge_tool_empty_selection() {
        let mut canvas = PixelBuffer::blank(8, 8);
        let mut tool = EnlargeTool::new(2.0).unwrap();
        tool.pointer_down(Point::new(3, 3), &canvas);
        assert_eq!(tool.pointer_up(Point::new(3, 3), &mut canvas).unwrap(), None);
        assert_eq!(canvas, PixelBuffer::blank(8, 8));
        assert!(EnlargeTool::new(0.0).is_err());
    }
}
