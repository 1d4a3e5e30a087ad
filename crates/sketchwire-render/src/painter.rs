//! Scene painting: engine shapes to surface strokes.

use sketchwire_core::{Scene, Shape};

use crate::surface::{StrokeAttrs, Surface, SurfaceResult};

/// Frame background fill.
pub const BACKGROUND_COLOR: &str = "#ffffff";

/// Eraser hover highlight color.
pub const HIGHLIGHT_COLOR: &str = "#ff0000";

/// Dash pattern of the highlight overlay.
const HIGHLIGHT_DASH: (f64, f64) = (6.0, 4.0);

/// How much wider the highlight overlay strokes than the shape itself.
const HIGHLIGHT_EXTRA_WIDTH: f64 = 2.0;

/// Stroke one shape, with an optional dashed highlight overlay on top.
///
/// Pure function of the shape's fields. Shapes with no drawable geometry
/// (a line that never left its anchor) paint nothing and succeed.
pub fn draw_shape(
    surface: &mut dyn Surface,
    shape: &Shape,
    highlighted: bool,
) -> SurfaceResult<()> {
    let path = shape.to_path();
    if path.elements().is_empty() {
        return Ok(());
    }

    let style = shape.style();
    let round = matches!(shape, Shape::Pencil(_));
    surface.stroke(
        &path,
        &StrokeAttrs {
            color: &style.color,
            width: style.stroke_width,
            dash: None,
            round,
        },
    )?;

    if highlighted {
        surface.stroke(
            &path,
            &StrokeAttrs {
                color: HIGHLIGHT_COLOR,
                width: style.stroke_width + HIGHLIGHT_EXTRA_WIDTH,
                dash: Some(HIGHLIGHT_DASH),
                round,
            },
        )?;
    }

    Ok(())
}

/// Paint one full frame: background, local shapes, remote shapes, then the
/// in-progress gesture on top.
///
/// A shape that fails to draw is logged and skipped, so one bad shape cannot
/// take the rest of the frame down with it. A failed clear aborts the frame:
/// there is nothing sensible to paint over.
pub fn render_frame(surface: &mut dyn Surface, scene: &Scene<'_>) -> SurfaceResult<()> {
    surface.clear(BACKGROUND_COLOR)?;

    for shape in scene.local.iter().chain(scene.remote.iter()) {
        let highlighted = scene.highlighted == Some(shape.id());
        if let Err(err) = draw_shape(surface, shape, highlighted) {
            log::error!("Failed to draw shape {}: {}", shape.id(), err);
        }
    }

    if let Some(shape) = scene.in_progress {
        if let Err(err) = draw_shape(surface, shape, false) {
            log::error!("Failed to draw in-progress shape {}: {}", shape.id(), err);
        }
    }

    Ok(())
}
