//! Place a second image on the canvas.
//!
//! The overlay is fitted to `min(canvas, overlay)` on each axis, centered,
//! and composited source-over. An overlay larger than the canvas is scaled
//! down to the canvas (nearest-neighbor, per axis, so the aspect ratio is
//! not kept); a smaller one is placed at its own size.
//!
//! # Example
//!
//! ```rust
//! use pixpaint_core::{PixelBuffer, Rect, Rgba8};
//! use pixpaint_ops::insert::insert_centered;
//!
//! let mut canvas = PixelBuffer::blank(10, 10);
//! let stamp = PixelBuffer::filled(4, 2, Rgba8::RED);
//! assert_eq!(insert_centered(&mut canvas, &stamp), Some(Rect::new(3, 4, 4, 2)));
//! assert_eq!(canvas.pixel(3, 4), Rgba8::RED);
//! ```

use pixpaint_core::{PixelBuffer, Rect};
use tracing::debug;

/// Composites `overlay` centered on `canvas`.
///
/// Returns the canvas area that was written, or `None` when either buffer
/// is empty.
pub fn insert_centered(canvas: &mut PixelBuffer, overlay: &PixelBuffer) -> Option<Rect> {
    if canvas.is_empty() || overlay.is_empty() {
        debug!(canvas = ?canvas.dimensions(), overlay = ?overlay.dimensions(), "nothing to insert");
        return None;
    }
    let (cw, ch) = canvas.dimensions();
    let (ow, oh) = overlay.dimensions();
    let (w, h) = (cw.min(ow), ch.min(oh));
    let placed = Rect::new((cw - w) / 2, (ch - h) / 2, w, h);
    debug!(%placed, overlay = ?(ow, oh), "insert_centered");

    let src_cols: Vec<usize> = (0..w).map(|dx| nearest(dx, w, ow) as usize).collect();
    for dy in 0..h {
        let src_row = overlay.row(nearest(dy, h, oh));
        let y = placed.y + dy;
        let dst_row = &mut canvas.row_mut(y)[placed.x as usize..placed.right() as usize];
        for (dst, &sx) in dst_row.iter_mut().zip(&src_cols) {
            *dst = src_row[sx].over(*dst);
        }
    }
    Some(placed)
}

/// Source index for destination `d` when `src` samples map onto `dst`,
/// taken at the pixel center. Identity when the sizes match.
#[inline]
fn nearest(d: u32, dst: u32, src: u32) -> u32 {
    let s = (2 * d as u64 + 1) * src as u64 / (2 * dst as u64);
    s.min(src as u64 - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixpaint_core::Rgba8;

    #[test]
    fn test_small_overlay_centered_at_own_size() {
        let mut canvas = PixelBuffer::blank(10, 8);
        let overlay = PixelBuffer::filled(4, 2, Rgba8::RED);
        let placed = insert_centered(&mut canvas, &overlay).unwrap();
        assert_eq!(placed, Rect::new(3, 3, 4, 2));

        for (x, y, p) in canvas.pixels() {
            let expected = if placed.contains(x, y) { Rgba8::RED } else { Rgba8::WHITE };
            assert_eq!(p, expected, "({x}, {y})");
        }
    }

    #[test]
    fn test_large_overlay_fitted_per_axis() {
        let mut canvas = PixelBuffer::blank(4, 4);
        let blue = Rgba8::opaque(0, 0, 255);
        let mut overlay = PixelBuffer::filled(8, 2, Rgba8::RED);
        for x in 4..8 {
            overlay.set_pixel(x, 0, blue);
            overlay.set_pixel(x, 1, blue);
        }

        // Width shrinks 8 -> 4, height keeps 2 and is centered.
        assert_eq!(insert_centered(&mut canvas, &overlay), Some(Rect::new(0, 1, 4, 2)));
        assert_eq!(canvas.row(0), &[Rgba8::WHITE; 4]);
        assert_eq!(canvas.row(1), &[Rgba8::RED, Rgba8::RED, blue, blue]);
        assert_eq!(canvas.row(2), &[Rgba8::RED, Rgba8::RED, blue, blue]);
        assert_eq!(canvas.row(3), &[Rgba8::WHITE; 4]);
    }

    #[test]
    fn test_transparent_overlay_keeps_canvas() {
        let mut canvas = PixelBuffer::filled(6, 6, Rgba8::opaque(10, 20, 30));
        let mut overlay = PixelBuffer::new(6, 6);
        overlay.set_pixel(2, 2, Rgba8::BLACK);
        insert_centered(&mut canvas, &overlay).unwrap();
        assert_eq!(canvas.pixel(2, 2), Rgba8::BLACK);
        assert_eq!(canvas.pixel(3, 3), Rgba8::opaque(10, 20, 30));
    }

    #[test]
    fn test_empty_buffers() {
        let mut canvas = PixelBuffer::blank(5, 5);
        assert_eq!(insert_centered(&mut canvas, &PixelBuffer::new(0, 3)), None);
        assert_eq!(canvas, PixelBuffer::blank(5, 5));
        assert_eq!(insert_centered(&mut PixelBuffer::new(0, 0), &canvas.clone()), None);
    }

    #[test]
    fn test_nearest_mapping() {
        assert_eq!((0..5).map(|d| nearest(d, 5, 5)).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!((0..3).map(|d| nearest(d, 3, 9)).collect::<Vec<_>>(), vec![1, 4, 7]);
    }
}
