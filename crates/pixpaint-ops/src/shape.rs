//! Shape descriptions for the rasterizer.
//!
//! A [`Shape`] is created when a drag starts, updated on every move with
//! [`Shape::drag_to`], rasterized on release and then dropped.

use pixpaint_core::{Point, Rgba8};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{OpsError, OpsResult};

/// Interior line fill drawn after the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPattern {
    /// Outline only.
    #[default]
    None,
    /// Evenly spaced horizontal lines.
    #[serde(alias = "horizontal")]
    HorizontalLines,
    /// Evenly spaced vertical lines.
    #[serde(alias = "vertical")]
    VerticalLines,
}

impl FromStr for FillPattern {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "outline" => Ok(Self::None),
            "horizontal" | "horizontal_lines" | "h" => Ok(Self::HorizontalLines),
            "vertical" | "vertical_lines" | "v" => Ok(Self::VerticalLines),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown fill pattern '{other}' (expected none, horizontal or vertical)"
            ))),
        }
    }
}

impl fmt::Display for FillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::HorizontalLines => "horizontal",
            Self::VerticalLines => "vertical",
        })
    }
}

/// Which kind of shape a tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Axis-aligned rectangle between two corners.
    Rectangle,
    /// Circle around a fixed center.
    Circle,
}

/// Geometry of a shape in buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeGeometry {
    /// Box spanned by two corner points, in any order.
    Rectangle {
        /// Corner where the drag started.
        a: Point,
        /// Opposite corner.
        b: Point,
    },
    /// Circle; `radius` is never negative.
    Circle {
        /// Center, fixed at drag start.
        center: Point,
        /// Radius in pixels.
        radius: i32,
    },
}

/// A shape with its stroke settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Where the shape is.
    pub geometry: ShapeGeometry,
    /// Outline and pattern color.
    pub stroke: Rgba8,
    /// Interior fill.
    pub pattern: FillPattern,
    /// Outline width in pixels, at least 1.
    pub line_width: u32,
}

impl Shape {
    /// A rectangle between two corners, 1px stroke, no pattern.
    pub fn rectangle(a: Point, b: Point, stroke: Rgba8) -> Self {
        Self {
            geometry: ShapeGeometry::Rectangle { a, b },
            stroke,
            pattern: FillPattern::None,
            line_width: 1,
        }
    }

    /// A circle; a negative radius is clamped to 0 (a single point).
    pub fn circle(center: Point, radius: i32, stroke: Rgba8) -> Self {
        Self {
            geometry: ShapeGeometry::Circle {
                center,
                radius: radius.max(0),
            },
            stroke,
            pattern: FillPattern::None,
            line_width: 1,
        }
    }

    /// A zero-extent shape of `kind` anchored at `origin`, as created on
    /// pointer down.
    pub fn start(kind: ShapeKind, origin: Point, stroke: Rgba8) -> Self {
        match kind {
            ShapeKind::Rectangle => Self::rectangle(origin, origin, stroke),
            ShapeKind::Circle => Self::circle(origin, 0, stroke),
        }
    }

    /// Sets the fill pattern.
    pub fn with_pattern(mut self, pattern: FillPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Sets the outline width; 0 is treated as 1.
    pub fn with_line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width.max(1);
        self
    }

    /// The kind of this shape.
    pub fn kind(&self) -> ShapeKind {
        match self.geometry {
            ShapeGeometry::Rectangle { .. } => ShapeKind::Rectangle,
            ShapeGeometry::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Updates the shape for a pointer at `p`.
    ///
    /// Rectangles move their second corner. Circles take the Chebyshev
    /// distance from the center as the new radius.
    pub fn drag_to(&mut self, p: Point) {
        match &mut self.geometry {
            ShapeGeometry::Rectangle { b, .. } => *b = p,
            ShapeGeometry::Circle { center, radius } => *radius = center.chebyshev(p),
        }
    }

    /// Inclusive extent `(top_left, bottom_right)` of the geometry,
    /// ignoring stroke width.
    pub fn extent(&self) -> (Point, Point) {
        match self.geometry {
            ShapeGeometry::Rectangle { a, b } => (
                Point::new(a.x.min(b.x), a.y.min(b.y)),
                Point::new(a.x.max(b.x), a.y.max(b.y)),
            ),
            ShapeGeometry::Circle { center, radius } => (
                Point::new(center.x.saturating_sub(radius), center.y.saturating_sub(radius)),
                Point::new(center.x.saturating_add(radius), center.y.saturating_add(radius)),
            ),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.geometry {
            ShapeGeometry::Rectangle { a, b } => write!(f, "rect {a}..{b}")?,
            ShapeGeometry::Circle { center, radius } => write!(f, "circle {center} r={radius}")?,
        }
        write!(f, " {} w={} {}", self.stroke, self.line_width, self.pattern)
    }
}
