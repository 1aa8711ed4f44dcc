//! # pixpaint-core
//!
//! Core types for the pixpaint raster engines.
//!
//! - [`Rgba8`] - 8-bit RGBA pixel
//! - [`Point`], [`Rect`] - buffer-space geometry
//! - [`PixelBuffer`] - copy-on-write 2-D pixel grid
//! - [`Error`], [`Result`] - bounds and dimension errors
//!
//! ## Crate Structure
//!
//! ```text
//! pixpaint-core (this crate)
//!    ^
//!    |
//!    +-- pixpaint-ops (bilateral filter, flood fill, shapes, gestures)
//!    +-- pixpaint-cli (headless collaborator: PNG in, PNG out)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/Deserialize for [`Rgba8`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod geometry;
pub mod pixel;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use geometry::{Point, Rect};
pub use pixel::Rgba8;

/// Prelude module for convenient imports.
///
/// ```
/// use pixpaint_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::PixelBuffer;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Rect};
    pub use crate::pixel::Rgba8;
}
