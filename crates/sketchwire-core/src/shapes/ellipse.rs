//! Ellipse shape.

use super::{complete_by_default, ShapeId, ShapeTrait, StrokeStyle};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse in bounding-box form.
///
/// Shares the rectangle's signed-extent convention; the center and radii are
/// derived, which keeps the wire format identical to the rectangle's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Drag anchor corner of the bounding box.
    #[serde(flatten)]
    pub origin: Point,
    /// Signed bounding-box width.
    pub width: f64,
    /// Signed bounding-box height.
    pub height: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: StrokeStyle,
    /// Whether the drawing gesture has finished.
    #[serde(default = "complete_by_default")]
    pub is_complete: bool,
}

impl Ellipse {
    /// Create a new in-progress ellipse with zero extent.
    pub fn new(id: ShapeId, origin: Point, style: StrokeStyle) -> Self {
        Self {
            id,
            origin,
            width: 0.0,
            height: 0.0,
            style,
            is_complete: false,
        }
    }

    /// Update the free corner during a drag.
    ///
    /// With `uniform` set, both extents take the larger magnitude while each
    /// keeps its own sign, so the constrained circle still grows toward the
    /// pointer's quadrant.
    pub fn drag_to(&mut self, current: Point, uniform: bool) {
        let mut width = current.x - self.origin.x;
        let mut height = current.y - self.origin.y;
        if uniform {
            let magnitude = width.abs().max(height.abs());
            width = magnitude.copysign(width);
            height = magnitude.copysign(height);
        }
        self.width = width;
        self.height = height;
    }

    /// Center of the ellipse.
    pub fn center(&self) -> Point {
        self.origin + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Absolute radii (x, y).
    pub fn radii(&self) -> (f64, f64) {
        (self.width.abs() / 2.0, self.height.abs() / 2.0)
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> kurbo::Ellipse {
        let (rx, ry) = self.radii();
        kurbo::Ellipse::new(self.center(), Vec2::new(rx, ry), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(
            self.origin,
            Point::new(self.origin.x + self.width, self.origin.y + self.height),
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        let (rx, ry) = self.radii();
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        let center = self.center();
        let nx = (point.x - center.x) / rx;
        let ny = (point.y - center.y) / ry;
        nx * nx + ny * ny <= 1.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &StrokeStyle {
        &self.style
    }
}
