//! Canvas Geometry
//!
//! Pure coordinate math for the node canvas: anchor points on node boxes
//! and the cubic bezier S-curves drawn between them. Everything here is
//! deterministic and allocation-free; rendering concerns stop at the SVG
//! path string.

use serde::{Deserialize, Serialize};

/// Node box width in canvas px
pub const NODE_WIDTH: f64 = 240.0;
/// Node box height in canvas px
pub const NODE_HEIGHT: f64 = 72.0;

/// A point in canvas coordinates (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Anchor on the right edge of a node box, vertically centered.
/// `top_left` is the node's position.
pub fn output_anchor(top_left: Point) -> Point {
    Point::new(top_left.x + NODE_WIDTH, top_left.y + NODE_HEIGHT / 2.0)
}

/// Anchor on the left edge of a node box, vertically centered.
pub fn input_anchor(top_left: Point) -> Point {
    Point::new(top_left.x, top_left.y + NODE_HEIGHT / 2.0)
}

/// Offset from a drop point to the node's top-left corner so that the
/// node lands centered under the cursor.
pub fn centered_drop(drop: Point) -> Point {
    Point::new(drop.x - NODE_WIDTH / 2.0, drop.y - NODE_HEIGHT / 2.0)
}

/// A cubic bezier segment from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub from: Point,
    pub c1: Point,
    pub c2: Point,
    pub to: Point,
}

impl CubicCurve {
    /// Render as an SVG path string (`M .. C ..`)
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.from.x,
            self.from.y,
            self.c1.x,
            self.c1.y,
            self.c2.x,
            self.c2.y,
            self.to.x,
            self.to.y
        )
    }
}

/// Horizontal S-curve between two anchor points.
///
/// Control points extend horizontally by half the absolute x-distance:
/// the curve leaves the source moving right and enters the target moving
/// right, which keeps connections readable even when the target sits to
/// the left of the source.
pub fn path_between(from: Point, to: Point) -> CubicCurve {
    let reach = (to.x - from.x).abs() * 0.5;
    CubicCurve {
        from,
        c1: Point::new(from.x + reach, from.y),
        c2: Point::new(to.x - reach, to.y),
        to,
    }
}

/// Curve between two node boxes: source output anchor to target input anchor.
pub fn connection_path(source_top_left: Point, target_top_left: Point) -> CubicCurve {
    path_between(output_anchor(source_top_left), input_anchor(target_top_left))
}
