//! Drawing-surface abstraction.

use kurbo::BezPath;
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Draw failed: {0}")]
    DrawFailed(String),
    #[error("Surface lost: {0}")]
    Lost(String),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Stroke parameters for one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeAttrs<'a> {
    /// Stroke color as a CSS color string.
    pub color: &'a str,
    /// Stroke width in canvas pixels.
    pub width: f64,
    /// Dash pattern (on, off); `None` strokes solid.
    pub dash: Option<(f64, f64)>,
    /// Round caps and joins, for freehand strokes.
    pub round: bool,
}

/// A 2D surface the frame loop paints onto.
///
/// Implementations wrap whatever drawing context the host provides (an HTML
/// canvas, a skia surface, a test recorder). Calls are stateless: every
/// stroke carries its full attributes, so implementations never leak dash or
/// cap state from one call into the next.
pub trait Surface {
    /// Clear the whole surface to one color.
    fn clear(&mut self, color: &str) -> SurfaceResult<()>;

    /// Stroke a path.
    fn stroke(&mut self, path: &BezPath, attrs: &StrokeAttrs<'_>) -> SurfaceResult<()>;
}
