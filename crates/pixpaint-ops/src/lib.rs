//! # pixpaint-ops
//!
//! The pixel engines behind pixpaint's tools.
//!
//! # Modules
//!
//! - [`bilateral`] - Edge-preserving windowed denoise
//! - [`parallel`] - Row-parallel bilateral filter (feature `parallel`)
//! - [`flood`] - Stack-based paint-bucket fill
//! - [`shape`], [`raster`] - Rectangles and circles with line-pattern fills
//! - [`enlarge`] - Magnify the center of a selection
//! - [`insert`] - Place a second image centered on the canvas
//! - [`gesture`] - Pointer state machines with scratch previews
//! - [`config`] - YAML-backed engine settings
//!
//! Every engine borrows the caller's [`PixelBuffer`](pixpaint_core::PixelBuffer)
//! for the duration of one call and keeps nothing afterwards.
//!
//! # Example
//!
//! ```rust
//! use pixpaint_core::{PixelBuffer, Point, Rgba8};
//! use pixpaint_ops::{bilateral, flood, raster::Rasterizer, shape::Shape};
//!
//! let mut canvas = PixelBuffer::blank(120, 80);
//!
//! let frame = Shape::rectangle(Point::new(10, 10), Point::new(100, 60), Rgba8::BLACK);
//! Rasterizer::default().draw(&mut canvas, &frame);
//!
//! let stats = flood::fill_canvas(&mut canvas, Point::new(50, 30), Rgba8::RED, Point::new(0, 0));
//! assert_eq!(stats.painted, 89 * 49);
//!
//! let smooth = bilateral::apply(&canvas, &bilateral::FilterParams::default());
//! assert_eq!(smooth.dimensions(), canvas.dimensions());
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - Rayon row parallelism for the bilateral filter

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cancel;
mod error;

pub mod bilateral;
pub mod config;
pub mod enlarge;
pub mod flood;
pub mod gesture;
pub mod insert;
pub mod raster;
pub mod shape;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use bilateral::FilterParams;
pub use cancel::CancelToken;
pub use config::EngineConfig;
pub use error::{OpsError, OpsResult};
pub use flood::{flood_fill, CanvasMatch, FillStats, MatchPredicate};
pub use gesture::{EnlargeTool, GesturePhase, ShapeTool};
pub use insert::insert_centered;
pub use raster::Rasterizer;
pub use shape::{FillPattern, Shape, ShapeKind};
