//! Benchmark fixtures for pixpaint.
//!
//! Run with: `cargo bench -p pixpaint-bench`

use pixpaint_core::{PixelBuffer, Rgba8};

/// Deterministic noisy gradient, the kind of input the denoiser sees.
pub fn noisy_gradient(width: u32, height: u32) -> PixelBuffer {
    let mut state = 0x1234_5678u32;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = (state % 31) as i32 - 15;
            let base = ((x + y) * 255 / (width + height).max(1)) as i32;
            let v = (base + noise).clamp(0, 255) as u8;
            pixels.push(Rgba8::opaque(v, v / 2, 255 - v));
        }
    }
    // Length matches width * height by construction.
    match PixelBuffer::from_pixels(width, height, pixels) {
        Ok(buf) => buf,
        Err(e) => unreachable!("{e}"),
    }
}
