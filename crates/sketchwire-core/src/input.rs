//! Pointer input events for unified mouse/touch handling.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether any modifier is held. The drawing tools only care that one is
    /// down, not which; the ellipse uses this for its uniform constraint.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Pointer event type.
///
/// Gestures are anchored on down and shaped by moves; where the pointer was
/// released does not matter, so `Up` carries nothing. Leaving the canvas
/// ends a drag the same way lifting the pointer does, so a stroke can never
/// keep growing while the pointer is elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point, modifiers: Modifiers },
    Up,
    Leave,
}
