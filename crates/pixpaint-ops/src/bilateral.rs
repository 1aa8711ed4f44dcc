//! Windowed bilateral denoising filter.
//!
//! Each output pixel is a weighted average of its `d x d` neighborhood,
//! where the weight of a neighbor is the product of two Gaussians: one on
//! color distance, one on spatial distance.
//!
//! ```text
//! weight = exp(-|c - n|² / (2·σc²) - (i² + j²) / (2·σs²))
//! out    = round(Σ weight·n / Σ weight)        per R, G, B channel
//! ```
//!
//! Neighbors that are close in both color and position dominate, so flat
//! regions are smoothed while strong edges survive.
//!
//! # Border policy
//!
//! Only pixels whose full window fits inside the buffer are filtered.
//! Pixels within `diameter / 2` of any edge are copied from the source.
//!
//! # Example
//!
//! ```rust
//! use pixpaint_core::{PixelBuffer, Rgba8};
//! use pixpaint_ops::bilateral::{apply, FilterParams};
//!
//! let src = PixelBuffer::filled(32, 32, Rgba8::opaque(90, 120, 150));
//! let out = apply(&src, &FilterParams::default());
//! assert_eq!(out, src);
//! ```

use crate::{CancelToken, OpsError, OpsResult};
use pixpaint_core::{PixelBuffer, Rgba8};
use tracing::{debug, trace};

/// Default window diameter.
pub const DEFAULT_DIAMETER: u32 = 7;
/// Default color sigma.
pub const DEFAULT_SIGMA_COLOR: f64 = 70.0;
/// Default spatial sigma.
pub const DEFAULT_SIGMA_SPACE: f64 = 70.0;

/// Immutable parameters of one filter invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    diameter: u32,
    sigma_color: f64,
    sigma_space: f64,
}

impl FilterParams {
    /// Creates validated filter parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] if `diameter` is even or zero,
    /// or if either sigma is not a finite positive number.
    pub fn new(diameter: u32, sigma_color: f64, sigma_space: f64) -> OpsResult<Self> {
        if diameter == 0 || diameter % 2 == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "diameter must be odd and >= 1, got {diameter}"
            )));
        }
        for (name, sigma) in [("sigma_color", sigma_color), ("sigma_space", sigma_space)] {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(OpsError::InvalidParameter(format!(
                    "{name} must be finite and > 0, got {sigma}"
                )));
            }
        }
        Ok(Self {
            diameter,
            sigma_color,
            sigma_space,
        })
    }

    /// Window diameter (odd).
    #[inline]
    pub fn diameter(&self) -> u32 {
        self.diameter
    }

    /// Half the window diameter; also the width of the unfiltered border.
    #[inline]
    pub fn half_diameter(&self) -> u32 {
        self.diameter / 2
    }

    /// Color-distance sigma.
    #[inline]
    pub fn sigma_color(&self) -> f64 {
        self.sigma_color
    }

    /// Spatial-distance sigma.
    #[inline]
    pub fn sigma_space(&self) -> f64 {
        self.sigma_space
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_DIAMETER,
            sigma_color: DEFAULT_SIGMA_COLOR,
            sigma_space: DEFAULT_SIGMA_SPACE,
        }
    }
}

/// Precomputed per-invocation state shared by the serial and parallel paths.
///
/// Both paths call [`Kernel::filter_row`], so their output is identical.
pub(crate) struct Kernel {
    half: i32,
    inv_two_sigma_color_sq: f64,
    /// `(i² + j²) / (2·σs²)` for every window offset, row-major.
    space_terms: Vec<f64>,
}

impl Kernel {
    pub(crate) fn new(params: &FilterParams) -> Self {
        let half = params.half_diameter() as i32;
        let two_sigma_space_sq = 2.0 * params.sigma_space * params.sigma_space;
        let mut space_terms = Vec::with_capacity((params.diameter * params.diameter) as usize);
        for i in -half..=half {
            for j in -half..=half {
                space_terms.push((i * i + j * j) as f64 / two_sigma_space_sq);
            }
        }
        Self {
            half,
            inv_two_sigma_color_sq: 1.0 / (2.0 * params.sigma_color * params.sigma_color),
            space_terms,
        }
    }

    /// Rows whose window fits vertically: `half..height-half`.
    pub(crate) fn rows(&self, height: u32) -> std::ops::Range<u32> {
        let half = self.half as u32;
        let end = height.saturating_sub(half);
        if end > half { half..end } else { 0..0 }
    }

    /// Filters the interior pixels of row `y` of `src` into `out`.
    ///
    /// `out` must already hold the source row so border columns stay copies.
    pub(crate) fn filter_row(&self, src: &PixelBuffer, y: u32, out: &mut [Rgba8]) {
        let half = self.half as u32;
        let end = src.width().saturating_sub(half);
        if end <= half {
            return;
        }
        for x in half..end {
            out[x as usize] = self.filter_pixel(src, x, y);
        }
    }

    fn filter_pixel(&self, src: &PixelBuffer, x: u32, y: u32) -> Rgba8 {
        let data = src.data();
        let width = src.width() as usize;
        let center = data[src.index_of(x, y)];

        let mut sum = [0.0f64; 3];
        let mut weight_sum = 0.0f64;
        let mut k = 0;

        for i in -self.half..=self.half {
            let row_base = (y as i32 + i) as usize * width;
            for j in -self.half..=self.half {
                let neighbor = data[row_base + (x as i32 + j) as usize];
                let color_term = center.rgb_distance_sq(neighbor) as f64 * self.inv_two_sigma_color_sq;
                let weight = (-color_term - self.space_terms[k]).exp();
                k += 1;

                weight_sum += weight;
                sum[0] += weight * neighbor.r as f64;
                sum[1] += weight * neighbor.g as f64;
                sum[2] += weight * neighbor.b as f64;
            }
        }

        // The center contributes weight 1, so this only trips if the
        // window is ever widened past what f64 can represent.
        if !(weight_sum > 0.0 && weight_sum.is_finite()) {
            return center;
        }

        let channel = |s: f64| (s / weight_sum).round().clamp(0.0, 255.0) as u8;
        Rgba8::new(channel(sum[0]), channel(sum[1]), channel(sum[2]), center.a)
    }
}

/// Applies one bilateral pass on the calling thread.
///
/// Returns a new buffer of identical dimensions; `src` is not modified.
pub fn apply(src: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    match apply_cancellable(src, params, &CancelToken::new()) {
        Ok(out) => out,
        Err(_) => unreachable!("a fresh token is never cancelled"),
    }
}

/// Applies one bilateral pass on the calling thread, checking `token`
/// between rows.
///
/// # Errors
///
/// Returns [`OpsError::Cancelled`] if the token fires during the pass.
pub fn apply_cancellable(
    src: &PixelBuffer,
    params: &FilterParams,
    token: &CancelToken,
) -> OpsResult<PixelBuffer> {
    debug!(
        w = src.width(),
        h = src.height(),
        diameter = params.diameter(),
        "bilateral::apply"
    );
    let kernel = Kernel::new(params);
    let mut out = src.clone();
    out.make_mut();

    for y in kernel.rows(src.height()) {
        token.check()?;
        kernel.filter_row(src, y, out.row_mut(y));
    }
    Ok(out)
}

/// Runs `passes` independent filter passes, each on the previous result.
///
/// Uses the row-parallel path when the `parallel` feature is enabled.
/// Zero passes returns a copy of `src`.
///
/// # Errors
///
/// Returns [`OpsError::Cancelled`] if the token fires.
pub fn apply_passes(
    src: &PixelBuffer,
    params: &FilterParams,
    passes: u32,
    token: &CancelToken,
) -> OpsResult<PixelBuffer> {
    let mut current = src.clone();
    for pass in 0..passes {
        trace!(pass, passes, "bilateral pass");
        current = run_pass(&current, params, token)?;
    }
    Ok(current)
}

#[cfg(feature = "parallel")]
fn run_pass(src: &PixelBuffer, params: &FilterParams, token: &CancelToken) -> OpsResult<PixelBuffer> {
    crate::parallel::bilateral_cancellable(src, params, token)
}

#[cfg(not(feature = "parallel"))]
fn run_pass(src: &PixelBuffer, params: &FilterParams, token: &CancelToken) -> OpsResult<PixelBuffer> {
    apply_cancellable(src, params, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: u32, a: Rgba8, b: Rgba8) -> PixelBuffer {
        let mut buf = PixelBuffer::new(size, size);
        for y in 0..size {
            for x in 0..size {
                buf.set_pixel(x, y, if (x + y) % 2 == 0 { a } else { b });
            }
        }
        buf
    }

    /// Pseudo-random test image (LCG) so tests stay deterministic.
    fn noise(width: u32, height: u32, seed: u32) -> PixelBuffer {
        let mut state = seed;
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        let pixels = (0..width * height)
            .map(|_| Rgba8::new(next(), next(), next(), next()))
            .collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn test_params_default() {
        let p = FilterParams::default();
        assert_eq!(p.diameter(), 7);
        assert_eq!(p.half_diameter(), 3);
        assert_eq!(p.sigma_color(), 70.0);
        assert_eq!(p.sigma_space(), 70.0);
    }

    #[test]
    fn test_params_validation() {
        assert!(FilterParams::new(1, 1.0, 1.0).is_ok());
        assert!(FilterParams::new(0, 70.0, 70.0).is_err());
        assert!(FilterParams::new(6, 70.0, 70.0).is_err());
        assert!(FilterParams::new(7, 0.0, 70.0).is_err());
        assert!(FilterParams::new(7, 70.0, -1.0).is_err());
        assert!(FilterParams::new(7, f64::NAN, 70.0).is_err());
        assert!(FilterParams::new(7, 70.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_dimensions_and_border_preserved() {
        let src = noise(20, 15, 7);
        let params = FilterParams::default();
        let out = apply(&src, &params);
        assert_eq!(out.dimensions(), src.dimensions());

        let half = params.half_diameter();
        for (x, y, p) in src.pixels() {
            let border = x < half || y < half || x >= 20 - half || y >= 15 - half;
            if border {
                assert_eq!(out.pixel(x, y), p, "border pixel ({x}, {y}) changed");
            }
        }
    }

    #[test]
    fn test_uniform_is_identity() {
        let src = PixelBuffer::filled(16, 16, Rgba8::new(12, 200, 99, 77));
        assert_eq!(apply(&src, &FilterParams::default()), src);
    }

    #[test]
    fn test_alpha_passes_through() {
        let src = noise(12, 12, 99);
        let out = apply(&src, &FilterParams::default());
        for (x, y, p) in src.pixels() {
            assert_eq!(out.pixel(x, y).a, p.a);
        }
    }

    #[test]
    fn test_checkerboard_single_window() {
        let light = Rgba8::opaque(140, 140, 140);
        let dark = Rgba8::opaque(100, 100, 100);
        let src = checkerboard(7, light, dark);
        let params = FilterParams::new(7, 70.0, 70.0).unwrap();
        let out = apply(&src, &params);

        // Reference blend of all 49 pixels around the center.
        let center = src.pixel(3, 3);
        let (mut sum, mut wsum) = (0.0f64, 0.0f64);
        for y in 0..7i32 {
            for x in 0..7i32 {
                let n = src.pixel(x as u32, y as u32);
                let cd = center.rgb_distance_sq(n) as f64;
                let sd = ((x - 3) * (x - 3) + (y - 3) * (y - 3)) as f64;
                let w = (-cd / (2.0 * 70.0 * 70.0) - sd / (2.0 * 70.0 * 70.0)).exp();
                sum += w * n.r as f64;
                wsum += w;
            }
        }
        let expected = (sum / wsum).round() as u8;

        let got = out.pixel(3, 3);
        assert_eq!(got.r, expected);
        assert_eq!(got.g, expected);
        assert_eq!(got.b, expected);
        assert_ne!(got, center);

        for (x, y, p) in src.pixels() {
            if (x, y) != (3, 3) {
                assert_eq!(out.pixel(x, y), p);
            }
        }
    }

    #[test]
    fn test_buffer_smaller_than_window() {
        let src = noise(5, 40, 3);
        assert_eq!(apply(&src, &FilterParams::default()), src);
        let empty = PixelBuffer::new(0, 0);
        assert_eq!(apply(&empty, &FilterParams::default()), empty);
    }

    #[test]
    fn test_diameter_one_is_identity() {
        let src = noise(9, 9, 11);
        let params = FilterParams::new(1, 70.0, 70.0).unwrap();
        assert_eq!(apply(&src, &params), src);
    }

    #[test]
    fn test_source_untouched() {
        let src = noise(16, 16, 5);
        let copy = src.clone();
        let _ = apply(&src, &FilterParams::default());
        assert_eq!(src, copy);
    }

    #[test]
    fn test_cancelled_before_start() {
        let src = noise(16, 16, 1);
        let token = CancelToken::new();
        token.cancel();
        let result = apply_cancellable(&src, &FilterParams::default(), &token);
        assert!(matches!(result, Err(OpsError::Cancelled)));
    }

    #[test]
    fn test_passes() {
        let src = noise(16, 16, 21);
        let params = FilterParams::default();
        let token = CancelToken::new();

        assert_eq!(apply_passes(&src, &params, 0, &token).unwrap(), src);

        let once = apply(&src, &params);
        let twice = apply(&once, &params);
        assert_eq!(apply_passes(&src, &params, 2, &token).unwrap(), twice);
    }
}
