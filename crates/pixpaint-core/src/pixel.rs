//! The 8-bit RGBA pixel type.
//!
//! Every engine in pixpaint works on [`Rgba8`] samples. The color math
//! (distances, equality for region matching) only looks at the R, G and B
//! channels; alpha is carried along untouched unless an operation explicitly
//! composites.
//!
//! # Usage
//!
//! ```rust
//! use pixpaint_core::Rgba8;
//!
//! let red: Rgba8 = "#ff0000".parse().unwrap();
//! assert_eq!(red, Rgba8::opaque(255, 0, 0));
//! assert!(red.same_rgb(Rgba8::new(255, 0, 0, 10)));
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One 8-bit-per-channel RGBA sample.
///
/// `#[repr(C)]` so a `&[Rgba8]` can be viewed as interleaved `RGBA` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Rgba8 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white, the cleared-canvas color.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque "white smoke" (245, 245, 245), the near-white canvas baseline.
    pub const WHITE_SMOKE: Self = Self::opaque(245, 245, 245);
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque red.
    pub const RED: Self = Self::opaque(255, 0, 0);
    /// Fully transparent black, used for empty preview overlays.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a pixel from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque pixel.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Returns the color channels as `[r, g, b]`.
    #[inline]
    pub const fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Returns all channels as `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Creates a pixel from `[r, g, b, a]`.
    #[inline]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Returns `true` if the color channels match, ignoring alpha.
    #[inline]
    pub fn same_rgb(self, other: Self) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Returns this pixel with its color channels replaced by `color`'s,
    /// keeping the current alpha.
    #[inline]
    pub fn with_rgb_of(self, color: Self) -> Self {
        Self::new(color.r, color.g, color.b, self.a)
    }

    /// Squared Euclidean distance between the color channels.
    #[inline]
    pub fn rgb_distance_sq(self, other: Self) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Returns `true` if alpha is 255.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Returns `true` if alpha is 0.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Source-over composite of `self` on top of `dst` (straight alpha).
    pub fn over(self, dst: Self) -> Self {
        match self.a {
            255 => self,
            0 => dst,
            sa => {
                let sa = sa as f32 / 255.0;
                let da = dst.a as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    return Self::TRANSPARENT;
                }
                let blend = |s: u8, d: u8| {
                    let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                    v.round().clamp(0.0, 255.0) as u8
                };
                Self::new(
                    blend(self.r, dst.r),
                    blend(self.g, dst.g),
                    blend(self.b, dst.b),
                    (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
                )
            }
        }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(arr: [u8; 4]) -> Self {
        Self::from_array(arr)
    }
}

impl From<[u8; 3]> for Rgba8 {
    fn from(arr: [u8; 3]) -> Self {
        Self::opaque(arr[0], arr[1], arr[2])
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parses `#rrggbb`, `#rrggbbaa`, `r,g,b` or `r,g,b,a`.
impl FromStr for Rgba8 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 && hex.len() != 8 {
                return Err(Error::invalid_color(s, "expected 6 or 8 hex digits"));
            }
            let mut channels = [255u8; 4];
            for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
                let digits = std::str::from_utf8(chunk)
                    .map_err(|_| Error::invalid_color(s, "non-ascii hex digit"))?;
                channels[i] = u8::from_str_radix(digits, 16)
                    .map_err(|_| Error::invalid_color(s, "bad hex digit"))?;
            }
            return Ok(Self::from_array(channels));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(Error::invalid_color(s, "expected 3 or 4 comma-separated channels"));
        }
        let mut channels = [255u8; 4];
        for (i, part) in parts.iter().enumerate() {
            channels[i] = part
                .parse::<u8>()
                .map_err(|_| Error::invalid_color(s, format!("channel '{part}' is not 0-255")))?;
        }
        Ok(Self::from_array(channels))
    }
}
