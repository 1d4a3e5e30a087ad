//! Pencil (freehand) shape.

use super::{
    complete_by_default, point_pairs, point_to_polyline_dist, ShapeId, ShapeTrait, StrokeStyle,
    MIN_HIT_WIDTH,
};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand stroke as a polyline of captured points.
///
/// While the stroke is live the point list grows under the interaction
/// machine's decimation; on completion it is reduced once and never mutated
/// again. Points serialize as `[[x, y], …]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pencil {
    pub(crate) id: ShapeId,
    /// First captured point (drag anchor).
    #[serde(flatten)]
    pub origin: Point,
    /// Captured points, anchor included.
    #[serde(with = "point_pairs", default)]
    pub points: Vec<Point>,
    /// Style properties.
    #[serde(flatten)]
    pub style: StrokeStyle,
    /// Whether the drawing gesture has finished.
    #[serde(default = "complete_by_default")]
    pub is_complete: bool,
}

impl Pencil {
    /// Create a new in-progress stroke seeded with its anchor.
    pub fn new(id: ShapeId, origin: Point, style: StrokeStyle) -> Self {
        Self {
            id,
            origin,
            points: vec![origin],
            style,
            is_complete: false,
        }
    }

    /// Reconstruct a completed stroke from reassembled parts.
    pub(crate) fn reconstruct(
        id: ShapeId,
        origin: Point,
        points: Vec<Point>,
        style: StrokeStyle,
    ) -> Self {
        Self {
            id,
            origin,
            points,
            style,
            is_complete: true,
        }
    }
}

impl ShapeTrait for Pencil {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(Rect::from_points(*first, *first), |acc, p| {
            acc.union_pt(*p)
        })
    }

    fn hit_test(&self, point: Point) -> bool {
        let hit_width = self.style.stroke_width.max(MIN_HIT_WIDTH);
        let dist = match self.points.as_slice() {
            [] => return false,
            [only] => (point - *only).hypot(),
            points => point_to_polyline_dist(point, points),
        };
        dist <= hit_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        if self.points.is_empty() {
            return path;
        }

        path.move_to(self.points[0]);
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }

        path
    }

    fn style(&self) -> &StrokeStyle {
        &self.style
    }
}
