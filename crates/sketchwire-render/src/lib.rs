//! Sketchwire Render Library
//!
//! Backend-agnostic painting for Sketchwire scenes. Embedders implement
//! [`Surface`] over their drawing API (an HTML canvas context, a GPU scene
//! builder, a test recorder) and drive a [`RenderLoop`] from their frame
//! scheduler.

mod frame;
mod painter;
mod surface;

pub use frame::RenderLoop;
pub use painter::{draw_shape, render_frame, BACKGROUND_COLOR, HIGHLIGHT_COLOR};
pub use surface::{StrokeAttrs, Surface, SurfaceError, SurfaceResult};
