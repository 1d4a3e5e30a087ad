//! Frame loop driver with cooperative cancellation.

use sketchwire_core::Scene;

use crate::painter::render_frame;
use crate::surface::Surface;

/// Owns a surface and repaints it on demand until cancelled.
///
/// The embedder schedules ticks (requestAnimationFrame, a timer, a compositor
/// callback) and calls [`RenderLoop::frame`] with the current scene on each
/// one. After [`RenderLoop::cancel`] every further tick is a no-op, so a
/// callback that fires after teardown started cannot touch the surface.
pub struct RenderLoop<S: Surface> {
    surface: S,
    cancelled: bool,
}

impl<S: Surface> RenderLoop<S> {
    /// Wrap a surface in a new, running loop.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            cancelled: false,
        }
    }

    /// Paint one frame of the given scene.
    ///
    /// Returns `false` once the loop is cancelled, telling the embedder to
    /// stop scheduling ticks. Render failures are logged, not surfaced: the
    /// next tick simply tries again.
    pub fn frame(&mut self, scene: &Scene<'_>) -> bool {
        if self.cancelled {
            return false;
        }
        if let Err(err) = render_frame(&mut self.surface, scene) {
            log::error!("Failed to render frame: {}", err);
        }
        true
    }

    /// Stop the loop. Safe to call more than once.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            log::debug!("Render loop cancelled");
        }
    }

    /// Whether the loop has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
