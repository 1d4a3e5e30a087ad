//! Rectangle shape.

use super::{complete_by_default, ShapeId, ShapeTrait, StrokeStyle};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at the drag origin.
///
/// `width` and `height` are signed: dragging up or left of the anchor leaves
/// them negative, and that is exactly what peers receive on the wire.
/// Consumers normalize through [`Rectangle::as_rect`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Drag anchor corner.
    #[serde(flatten)]
    pub origin: Point,
    /// Signed width (pointer x − anchor x).
    pub width: f64,
    /// Signed height (pointer y − anchor y).
    pub height: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: StrokeStyle,
    /// Whether the drawing gesture has finished.
    #[serde(default = "complete_by_default")]
    pub is_complete: bool,
}

impl Rectangle {
    /// Create a new in-progress rectangle with zero extent.
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
    pub fn drag_to(&mut self, current: Point) {
        self.width = current.x - self.origin.x;
        self.height = current.y - self.origin.y;
    }

    /// Get the rectangle as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(
            self.origin,
            Point::new(self.origin.x + self.width, self.origin.y + self.height),
        )
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point) -> bool {
        // Erasing targets the filled bounding geometry, not just the border.
        self.as_rect().contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &StrokeStyle {
        &self.style
    }
}
