//! Line shape.

use super::{
    complete_by_default, point_to_segment_dist, ShapeId, ShapeTrait, StrokeStyle, MIN_HIT_WIDTH,
};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A straight line segment.
///
/// The endpoint is seeded to the anchor at creation, so every line carries a
/// full pair of endpoints from the first moment it exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point (drag anchor).
    #[serde(flatten)]
    pub origin: Point,
    pub end_x: f64,
    pub end_y: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: StrokeStyle,
    /// Whether the drawing gesture has finished.
    #[serde(default = "complete_by_default")]
    pub is_complete: bool,
}

impl Line {
    /// Create a new in-progress line collapsed onto its anchor.
    pub fn new(id: ShapeId, origin: Point, style: StrokeStyle) -> Self {
        Self {
            id,
            origin,
            end_x: origin.x,
            end_y: origin.y,
            style,
            is_complete: false,
        }
    }

    /// Update the endpoint during a drag.
    pub fn drag_to(&mut self, current: Point) {
        self.end_x = current.x;
        self.end_y = current.y;
    }

    pub fn start(&self) -> Point {
        self.origin
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    fn hit_test(&self, point: Point) -> bool {
        let hit_width = self.style.stroke_width.max(MIN_HIT_WIDTH);
        point_to_segment_dist(point, self.start(), self.end()) <= hit_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if self.start() == self.end() {
            return path;
        }
        path.move_to(self.start());
        path.line_to(self.end());
        path
    }

    fn style(&self) -> &StrokeStyle {
        &self.style
    }
}
