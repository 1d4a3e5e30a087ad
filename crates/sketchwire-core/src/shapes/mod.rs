//! Shape definitions for the shared canvas.

mod ellipse;
mod line;
mod pencil;
mod rectangle;

pub use ellipse::Ellipse;
pub use line::Line;
pub use pencil::Pencil;
pub use rectangle::Rectangle;

use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Minimum stroke width used for hit testing thin shapes, in canvas pixels.
/// A 1px line would be nearly impossible to erase without this floor.
pub const MIN_HIT_WIDTH: f64 = 10.0;

/// Stroke style shared by every shape kind.
///
/// Colors travel as CSS color strings (`"#000000"`) so that values coming from
/// peers or persisted snapshots round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width in canvas pixels.
    pub stroke_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            stroke_width: 2.0,
        }
    }
}

/// The four shape kinds a room can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Pencil,
}

impl ShapeKind {
    /// Wire/display name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Pencil => "pencil",
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Serde default for `is_complete`: persisted snapshot records omit the flag
/// and are complete by definition.
pub(crate) fn complete_by_default() -> bool {
    true
}

/// Serialize point lists as `[[x, y], …]` pairs, the room wire format.
pub(crate) mod point_pairs {
    use kurbo::Point;
    use serde::de::Deserializer;
    use serde::ser::{SerializeSeq, Serializer};
    use serde::Deserialize;

    pub fn serialize<S: Serializer>(points: &[Point], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(points.len()))?;
        for p in points {
            seq.serialize_element(&[p.x, p.y])?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Point>, D::Error> {
        // Tolerate an explicit `null` from sparse snapshot columns.
        let pairs = Option::<Vec<[f64; 2]>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect())
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in canvas coordinates) hits this shape.
    /// Outline shapes use a stroke of at least [`MIN_HIT_WIDTH`]; filled
    /// bounding geometry is used for rectangles and ellipses.
    fn hit_test(&self, point: Point) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &StrokeStyle;
}

/// Tagged union over all shape kinds.
///
/// Serializes to the flat wire form the room protocol uses, e.g.
/// `{"type":"line","id":…,"x":…,"y":…,"endX":…,"endY":…,"color":…,
/// "strokeWidth":…,"isComplete":…}`. Unknown inbound fields (legacy `radius`,
/// persistence metadata) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Pencil(Pencil),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Ellipse(s) => s.id(),
            Shape::Line(s) => s.id(),
            Shape::Pencil(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Pencil(_) => ShapeKind::Pencil,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Pencil(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point),
            Shape::Ellipse(s) => s.hit_test(point),
            Shape::Line(s) => s.hit_test(point),
            Shape::Pencil(s) => s.hit_test(point),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Ellipse(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
            Shape::Pencil(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &StrokeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Ellipse(s) => s.style(),
            Shape::Line(s) => s.style(),
            Shape::Pencil(s) => s.style(),
        }
    }

    /// Whether the drawing gesture for this shape has finished.
    pub fn is_complete(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.is_complete,
            Shape::Ellipse(s) => s.is_complete,
            Shape::Line(s) => s.is_complete,
            Shape::Pencil(s) => s.is_complete,
        }
    }

    /// Mark the drawing gesture as finished.
    pub fn mark_complete(&mut self) {
        match self {
            Shape::Rectangle(s) => s.is_complete = true,
            Shape::Ellipse(s) => s.is_complete = true,
            Shape::Line(s) => s.is_complete = true,
            Shape::Pencil(s) => s.is_complete = true,
        }
    }
}
