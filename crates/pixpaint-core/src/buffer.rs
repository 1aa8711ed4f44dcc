//! The [`PixelBuffer`] raster every engine reads and writes.
//!
//! # Memory Layout
//!
//! Pixels are stored **row-major**, top-to-bottom, one [`Rgba8`] per pixel:
//!
//! ```text
//! [P(0,0) P(1,0) ... P(w-1,0)]  ← Row 0
//! [P(0,1) P(1,1) ... P(w-1,1)]  ← Row 1
//! ...
//! ```
//!
//! # Ownership
//!
//! Storage lives behind an [`Arc`], so `clone()` is cheap and the first
//! mutation of a shared buffer copies it (copy-on-write). A clone handed to
//! an engine as its read-only source can therefore never alias the output
//! the engine writes.
//!
//! # Bounds
//!
//! [`pixel`](PixelBuffer::pixel) and [`set_pixel`](PixelBuffer::set_pixel)
//! panic on out-of-range coordinates. Use [`try_pixel`](PixelBuffer::try_pixel),
//! [`try_set_pixel`](PixelBuffer::try_set_pixel) or
//! [`get_pixel`](PixelBuffer::get_pixel) where a coordinate comes from outside.
//!
//! # Usage
//!
//! ```rust
//! use pixpaint_core::{PixelBuffer, Rgba8};
//!
//! let mut canvas = PixelBuffer::blank(64, 48);
//! canvas.set_pixel(10, 10, Rgba8::RED);
//! assert_eq!(canvas.pixel(10, 10), Rgba8::RED);
//! assert_eq!(canvas.pixel(0, 0), Rgba8::WHITE);
//! ```

use crate::{Error, Point, Rect, Result, Rgba8};
use rayon::prelude::*;
use std::sync::Arc;

/// Owned 2-D grid of [`Rgba8`] samples.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Pixel storage (Arc for cheap cloning)
    data: Arc<Vec<Rgba8>>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
}

impl PixelBuffer {
    /// Creates a buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Creates a buffer filled with `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Rgba8) -> Self {
        let count = width as usize * height as usize;
        Self {
            data: Arc::new(vec![pixel; count]),
            width,
            height,
        }
    }

    /// Creates a freshly cleared (opaque white) canvas.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::WHITE)
    }

    /// Creates a buffer from existing pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, pixels.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(pixels),
            width,
            height,
        })
    }

    /// Creates a buffer from interleaved `RGBA` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the byte count doesn't match.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Self::from_interleaved(width, height, bytes, 4)
    }

    /// Creates an opaque buffer from interleaved `RGB` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the byte count doesn't match.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        Self::from_interleaved(width, height, bytes, 3)
    }

    fn from_interleaved(width: u32, height: u32, bytes: &[u8], channels: usize) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        if bytes.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} bytes, got {}", expected, bytes.len()),
            ));
        }
        let pixels = bytes
            .chunks_exact(channels)
            .map(|c| match channels {
                4 => Rgba8::new(c[0], c[1], c[2], c[3]),
                _ => Rgba8::opaque(c[0], c[1], c[2]),
            })
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Returns the pixels as interleaved `RGBA` bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Returns the pixels as interleaved `RGB` bytes, dropping alpha.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|p| p.rgb()).collect()
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns a rectangle covering the entire buffer.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the buffer has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if a signed coordinate lies inside the buffer.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Returns `true` if `p` lies inside the buffer.
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x as i64, p.y as i64)
    }

    /// Row-major index of (x, y). Caller guarantees bounds.
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel storage.
    #[inline]
    pub fn data(&self) -> &[Rgba8] {
        &self.data
    }

    /// Returns mutable pixel storage, copying it first if shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [Rgba8] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Ensures this buffer has exclusive ownership of its storage.
    ///
    /// Call this before extensive mutations to avoid repeated CoW checks.
    #[inline]
    pub fn make_mut(&mut self) {
        let _ = Arc::make_mut(&mut self.data);
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for buffer {}x{}",
            self.width,
            self.height
        );
        self.data[self.index_of(x, y)]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Rgba8> {
        if self.contains(x, y) {
            Some(self.data[self.index_of(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if (x, y) is outside the buffer.
    #[inline]
    pub fn try_pixel(&self, x: i64, y: i64) -> Result<Rgba8> {
        self.get_pixel(x, y)
            .ok_or_else(|| Error::out_of_bounds(x, y, self.width, self.height))
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba8) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for buffer {}x{}",
            self.width,
            self.height
        );
        let idx = self.index_of(x, y);
        self.data_mut()[idx] = pixel;
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if (x, y) is outside the buffer.
    #[inline]
    pub fn try_set_pixel(&mut self, x: i64, y: i64, pixel: Rgba8) -> Result<()> {
        if !self.contains(x, y) {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        self.set_pixel(x as u32, y as u32, pixel);
        Ok(())
    }

    /// Writes `pixel` at (x, y) if it is inside the buffer; returns whether
    /// a write happened. Drawing routines use this to clip.
    #[inline]
    pub fn put_clipped(&mut self, x: i64, y: i64, pixel: Rgba8) -> bool {
        if self.contains(x, y) {
            let idx = self.index_of(x as u32, y as u32);
            self.data_mut()[idx] = pixel;
            true
        } else {
            false
        }
    }

    /// Fills the entire buffer with a pixel value.
    pub fn fill(&mut self, pixel: Rgba8) {
        self.data_mut().fill(pixel);
    }

    /// Clears the canvas to `color` (white for the "clear" action).
    pub fn clear(&mut self, color: Rgba8) {
        self.fill(color);
    }

    /// Returns a row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgba8] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Returns a mutable row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [Rgba8] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y as usize * self.width as usize;
        let width = self.width as usize;
        &mut self.data_mut()[start..start + width]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba8)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &p)| ((i as u32) % width, (i as u32) / width, p))
    }

    /// Source-over composites `overlay` onto this buffer.
    ///
    /// Used to show a preview overlay on top of the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the sizes differ.
    pub fn composite_over(&mut self, overlay: &PixelBuffer) -> Result<()> {
        if self.dimensions() != overlay.dimensions() {
            return Err(Error::dimension_mismatch(
                self.dimensions(),
                overlay.dimensions(),
            ));
        }
        let src = overlay.data();
        self.data_mut()
            .par_iter_mut()
            .zip(src.par_iter())
            .for_each(|(dst, &s)| *dst = s.over(*dst));
        Ok(())
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_new() {
        let buf = PixelBuffer::new(100, 50);
        assert_eq!(buf.dimensions(), (100, 50));
        assert_eq!(buf.pixel_count(), 5000);
        assert_eq!(buf.pixel(99, 49), Rgba8::TRANSPARENT);
        assert!(!buf.is_empty());
        assert!(PixelBuffer::new(0, 10).is_empty());
    }

    #[test]
    fn test_set_get_pixel() {
        let mut buf = PixelBuffer::blank(10, 10);
        buf.set_pixel(5, 5, Rgba8::RED);
        assert_eq!(buf.pixel(5, 5), Rgba8::RED);
        assert_eq!(buf.pixel(0, 0), Rgba8::WHITE);
        assert_eq!(buf.get_pixel(-1, 0), None);
        assert_eq!(buf.get_pixel(9, 9), Some(Rgba8::WHITE));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_pixel_out_of_bounds_panics() {
        let buf = PixelBuffer::blank(4, 4);
        let _ = buf.pixel(4, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_pixel_out_of_bounds_panics() {
        let mut buf = PixelBuffer::blank(4, 4);
        buf.set_pixel(0, 7, Rgba8::RED);
    }

    #[test]
    fn test_try_accessors() {
        let mut buf = PixelBuffer::blank(4, 4);
        let err = buf.try_pixel(4, 1).unwrap_err();
        assert!(err.is_bounds_error());
        assert!(buf.try_set_pixel(-1, 0, Rgba8::RED).is_err());
        buf.try_set_pixel(3, 3, Rgba8::RED).unwrap();
        assert_eq!(buf.try_pixel(3, 3).unwrap(), Rgba8::RED);
    }

    #[test]
    fn test_put_clipped() {
        let mut buf = PixelBuffer::blank(4, 4);
        assert!(!buf.put_clipped(-1, 2, Rgba8::RED));
        assert!(!buf.put_clipped(2, 4, Rgba8::RED));
        assert!(buf.put_clipped(2, 3, Rgba8::RED));
        assert_eq!(buf.pixel(2, 3), Rgba8::RED);
    }

    #[test]
    fn test_from_pixels_wrong_size() {
        assert!(PixelBuffer::from_pixels(10, 10, vec![Rgba8::WHITE; 99]).is_err());
    }

    #[test]
    fn test_byte_roundtrip() {
        let bytes: Vec<u8> = (0..2 * 2 * 4).map(|i| i as u8).collect();
        let buf = PixelBuffer::from_rgba_bytes(2, 2, &bytes).unwrap();
        assert_eq!(buf.pixel(1, 0), Rgba8::new(4, 5, 6, 7));
        assert_eq!(buf.to_rgba_bytes(), bytes);

        let rgb = PixelBuffer::from_rgb_bytes(1, 1, &[1, 2, 3]).unwrap();
        assert_eq!(rgb.pixel(0, 0), Rgba8::opaque(1, 2, 3));
        assert_eq!(rgb.to_rgb_bytes(), vec![1, 2, 3]);
        assert!(PixelBuffer::from_rgb_bytes(2, 1, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_row_access() {
        let mut buf = PixelBuffer::blank(3, 2);
        buf.row_mut(1).fill(Rgba8::BLACK);
        assert_eq!(buf.row(0), &[Rgba8::WHITE; 3]);
        assert_eq!(buf.row(1), &[Rgba8::BLACK; 3]);
    }

    #[test]
    fn test_pixels_iter_coords() {
        let mut buf = PixelBuffer::blank(3, 2);
        buf.set_pixel(2, 1, Rgba8::RED);
        let red: Vec<_> = buf.pixels().filter(|&(_, _, p)| p == Rgba8::RED).collect();
        assert_eq!(red, vec![(2, 1, Rgba8::RED)]);
    }

    #[test]
    fn test_clone_cow() {
        let a = PixelBuffer::blank(10, 10);
        let mut b = a.clone();
        b.set_pixel(0, 0, Rgba8::RED);
        assert_eq!(a.pixel(0, 0), Rgba8::WHITE);
        assert_eq!(b.pixel(0, 0), Rgba8::RED);
    }

    #[test]
    fn test_composite_over() {
        let mut canvas = PixelBuffer::blank(4, 4);
        let mut overlay = PixelBuffer::new(4, 4);
        overlay.set_pixel(1, 1, Rgba8::RED);
        canvas.composite_over(&overlay).unwrap();
        assert_eq!(canvas.pixel(1, 1), Rgba8::RED);
        assert_eq!(canvas.pixel(0, 0), Rgba8::WHITE);

        let small = PixelBuffer::new(2, 2);
        assert!(canvas.composite_over(&small).is_err());
    }
}
