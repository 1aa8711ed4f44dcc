//! Stack-based flood fill.
//!
//! Recolors the 4-connected region reachable from a seed whose pixels
//! satisfy a [`MatchPredicate`]. The traversal uses an explicit stack and a
//! visited mask, so region size is bounded only by memory, never by the
//! call stack, and no pixel is written twice.
//!
//! The paint bucket uses [`CanvasMatch`]: a pixel belongs to the region if
//! its RGB equals the color sampled at a reference coordinate, or equals one
//! of the blank-canvas colors (white and white-smoke).
//!
//! ```rust
//! use pixpaint_core::{PixelBuffer, Point, Rgba8};
//! use pixpaint_ops::flood::{flood_fill, CanvasMatch};
//!
//! let mut buf = PixelBuffer::blank(10, 10);
//! let pred = CanvasMatch::sample(&buf, Point::new(0, 0)).unwrap();
//! let stats = flood_fill(&mut buf, Point::new(5, 5), Rgba8::RED, &pred);
//! assert_eq!(stats.painted, 100);
//! ```

use pixpaint_core::{PixelBuffer, Point, Rect, Rgba8};
use tracing::debug;

/// Decides whether a pixel color belongs to the fill region.
pub trait MatchPredicate {
    /// Returns `true` if `color` should be recolored.
    fn matches(&self, color: Rgba8) -> bool;
}

impl<F> MatchPredicate for F
where
    F: Fn(Rgba8) -> bool,
{
    #[inline]
    fn matches(&self, color: Rgba8) -> bool {
        self(color)
    }
}

/// Blank-canvas colors treated as fillable background.
pub const CANVAS_BACKGROUNDS: [Rgba8; 2] = [Rgba8::WHITE, Rgba8::WHITE_SMOKE];

/// The paint-bucket predicate: target color or a blank-canvas color.
///
/// Comparison is on RGB only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasMatch {
    target: Rgba8,
    backgrounds: Vec<Rgba8>,
}

impl CanvasMatch {
    /// Matches `target` and the default [`CANVAS_BACKGROUNDS`].
    pub fn new(target: Rgba8) -> Self {
        Self {
            target,
            backgrounds: CANVAS_BACKGROUNDS.to_vec(),
        }
    }

    /// Matches `target` only.
    pub fn exact(target: Rgba8) -> Self {
        Self {
            target,
            backgrounds: Vec::new(),
        }
    }

    /// Samples the target color at `reference`. Returns `None` if the
    /// reference lies outside the buffer.
    pub fn sample(buf: &PixelBuffer, reference: Point) -> Option<Self> {
        buf.get_pixel(reference.x as i64, reference.y as i64)
            .map(Self::new)
    }

    /// Replaces the background color list.
    pub fn with_backgrounds(mut self, backgrounds: impl IntoIterator<Item = Rgba8>) -> Self {
        self.backgrounds = backgrounds.into_iter().collect();
        self
    }

    /// The sampled target color.
    pub fn target(&self) -> Rgba8 {
        self.target
    }

    /// Background colors matched in addition to the target.
    pub fn backgrounds(&self) -> &[Rgba8] {
        &self.backgrounds
    }
}

impl MatchPredicate for CanvasMatch {
    fn matches(&self, color: Rgba8) -> bool {
        color.same_rgb(self.target) || self.backgrounds.iter().any(|bg| color.same_rgb(*bg))
    }
}

/// Summary of one fill call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillStats {
    /// Pixels recolored.
    pub painted: usize,
    /// In-bounds, unvisited pixels the predicate was evaluated on.
    pub examined: usize,
    /// Bounding box of the painted pixels, `None` if nothing was painted.
    pub bounds: Option<Rect>,
}

/// Flood-fills the region connected to `seed`.
///
/// Every matching pixel reachable through 4-connected matching neighbors
/// gets the RGB of `replacement`; its alpha is kept. A seed outside the
/// buffer, or one that does not match, paints nothing.
pub fn flood_fill<P>(buf: &mut PixelBuffer, seed: Point, replacement: Rgba8, predicate: &P) -> FillStats
where
    P: MatchPredicate + ?Sized,
{
    fill_with(buf, seed, replacement, predicate, |_| {})
}

/// Paint-bucket fill: samples the target at `reference`, then fills from
/// `seed` with [`CanvasMatch`].
///
/// A reference outside the buffer falls back to background-only matching.
pub fn fill_canvas(buf: &mut PixelBuffer, seed: Point, replacement: Rgba8, reference: Point) -> FillStats {
    let predicate = CanvasMatch::sample(buf, reference).unwrap_or_else(|| {
        debug!(%reference, "fill reference outside buffer, matching backgrounds only");
        CanvasMatch::new(Rgba8::WHITE)
    });
    flood_fill(buf, seed, replacement, &predicate)
}

/// Fill core. `on_write` observes every painted coordinate.
pub(crate) fn fill_with<P, W>(
    buf: &mut PixelBuffer,
    seed: Point,
    replacement: Rgba8,
    predicate: &P,
    mut on_write: W,
) -> FillStats
where
    P: MatchPredicate + ?Sized,
    W: FnMut(Point),
{
    let mut stats = FillStats::default();
    if !buf.contains_point(seed) {
        debug!(%seed, w = buf.width(), h = buf.height(), "flood fill seed outside buffer");
        return stats;
    }

    let (width, height) = buf.dimensions();
    let mut visited = vec![false; buf.pixel_count()];
    let mut stack = vec![seed];
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (u32::MAX, u32::MAX, 0u32, 0u32);
    let data = buf.data_mut();

    while let Some(p) = stack.pop() {
        if p.x < 0 || p.y < 0 || p.x as u32 >= width || p.y as u32 >= height {
            continue;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        let idx = y as usize * width as usize + x as usize;
        if visited[idx] {
            continue;
        }

        stats.examined += 1;
        let current = data[idx];
        if !predicate.matches(current) {
            continue;
        }

        data[idx] = current.with_rgb_of(replacement);
        visited[idx] = true;
        stats.painted += 1;
        on_write(p);

        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);

        stack.extend(p.neighbors4());
    }

    if stats.painted > 0 {
        stats.bounds = Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1));
    }
    debug!(%seed, painted = stats.painted, examined = stats.examined, "flood fill done");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_fill_blank_canvas() {
        let mut buf = PixelBuffer::blank(10, 10);
        let pred = CanvasMatch::sample(&buf, Point::new(0, 0)).unwrap();
        let stats = flood_fill(&mut buf, Point::new(5, 5), Rgba8::RED, &pred);

        assert_eq!(stats.painted, 100);
        assert_eq!(stats.bounds, Some(Rect::new(0, 0, 10, 10)));
        assert!(buf.pixels().all(|(_, _, p)| p == Rgba8::RED));
    }

    #[test]
    fn test_wall_confines_fill() {
        let mut buf = PixelBuffer::blank(9, 6);
        for y in 0..6 {
            buf.set_pixel(4, y, Rgba8::BLACK);
        }
        let stats = fill_canvas(&mut buf, Point::new(1, 1), Rgba8::RED, Point::new(0, 0));

        assert_eq!(stats.painted, 4 * 6);
        for (x, y, p) in buf.pixels() {
            match x {
                0..=3 => assert_eq!(p, Rgba8::RED, "({x}, {y})"),
                4 => assert_eq!(p, Rgba8::BLACK),
                _ => assert_eq!(p, Rgba8::WHITE),
            }
        }
    }

    #[test]
    fn test_each_pixel_written_once() {
        let mut buf = PixelBuffer::blank(24, 17);
        // Diagonal gaps make the stack revisit coordinates many times.
        for i in 0..17 {
            buf.set_pixel(i, i, Rgba8::BLACK);
        }
        let pred = CanvasMatch::new(Rgba8::WHITE);
        let mut writes: HashMap<Point, u32> = HashMap::new();
        let stats = fill_with(&mut buf, Point::new(20, 2), Rgba8::RED, &pred, |p| {
            *writes.entry(p).or_default() += 1;
        });

        assert!(writes.values().all(|&n| n == 1));
        assert_eq!(writes.len(), stats.painted);
    }

    #[test]
    fn test_replacement_equal_to_target_terminates() {
        let mut buf = PixelBuffer::blank(8, 8);
        let pred = CanvasMatch::new(Rgba8::WHITE);
        let stats = flood_fill(&mut buf, Point::new(3, 3), Rgba8::WHITE, &pred);
        assert_eq!(stats.painted, 64);
        assert_eq!(buf, PixelBuffer::blank(8, 8));
    }

    #[test]
    fn test_seed_out_of_bounds() {
        let mut buf = PixelBuffer::blank(4, 4);
        let pred = CanvasMatch::new(Rgba8::WHITE);
        for seed in [Point::new(-1, 0), Point::new(0, 4), Point::new(100, -100)] {
            let stats = flood_fill(&mut buf, seed, Rgba8::RED, &pred);
            assert_eq!(stats, FillStats::default());
        }
        assert_eq!(buf, PixelBuffer::blank(4, 4));
    }

    #[test]
    fn test_non_matching_seed() {
        let mut buf = PixelBuffer::filled(5, 5, Rgba8::opaque(10, 10, 10));
        let pred = CanvasMatch::exact(Rgba8::WHITE);
        let stats = flood_fill(&mut buf, Point::new(2, 2), Rgba8::RED, &pred);
        assert_eq!(stats.painted, 0);
        assert_eq!(stats.examined, 1);
        assert_eq!(stats.bounds, None);
    }

    #[test]
    fn test_backgrounds_join_regions() {
        // Target is blue at the reference; white-smoke is still fillable.
        let blue = Rgba8::opaque(0, 0, 255);
        let mut buf = PixelBuffer::filled(6, 1, blue);
        buf.set_pixel(3, 0, Rgba8::WHITE_SMOKE);
        buf.set_pixel(5, 0, Rgba8::BLACK);

        let stats = fill_canvas(&mut buf, Point::new(0, 0), Rgba8::RED, Point::new(0, 0));
        assert_eq!(stats.painted, 5);
        assert_eq!(buf.pixel(3, 0), Rgba8::RED);
        assert_eq!(buf.pixel(5, 0), Rgba8::BLACK);
    }

    #[test]
    fn test_alpha_kept_rgb_compared() {
        let mut buf = PixelBuffer::filled(3, 3, Rgba8::new(255, 255, 255, 40));
        let pred = CanvasMatch::exact(Rgba8::WHITE);
        flood_fill(&mut buf, Point::new(1, 1), Rgba8::RED, &pred);
        assert!(buf.pixels().all(|(_, _, p)| p == Rgba8::new(255, 0, 0, 40)));
    }

    #[test]
    fn test_custom_backgrounds() {
        let grey = Rgba8::opaque(128, 128, 128);
        let pred = CanvasMatch::exact(Rgba8::BLACK).with_backgrounds([grey]);
        assert_eq!(pred.target(), Rgba8::BLACK);
        assert_eq!(pred.backgrounds(), &[grey]);
        assert!(pred.matches(grey));
        assert!(!pred.matches(Rgba8::WHITE));
    }

    #[test]
    fn test_closure_predicate() {
        let mut buf = PixelBuffer::filled(4, 4, Rgba8::opaque(200, 0, 0));
        buf.set_pixel(0, 0, Rgba8::opaque(10, 0, 0));
        let stats = flood_fill(&mut buf, Point::new(3, 3), Rgba8::BLACK, &|c: Rgba8| c.r > 100);
        assert_eq!(stats.painted, 15);
        assert_eq!(buf.pixel(0, 0), Rgba8::opaque(10, 0, 0));
    }

    #[test]
    fn test_large_region_no_recursion() {
        let mut buf = PixelBuffer::blank(512, 512);
        let stats = fill_canvas(&mut buf, Point::new(256, 256), Rgba8::BLACK, Point::new(0, 0));
        assert_eq!(stats.painted, 512 * 512);
    }
}
