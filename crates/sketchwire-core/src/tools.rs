//! Drawing tools and the in-progress gesture state machine.

use kurbo::Point;

use crate::input::Modifiers;
use crate::shapes::{Ellipse, Line, Pencil, Rectangle, Shape, ShapeId, StrokeStyle};

/// Minimum pointer travel before a live pencil point is recorded, in canvas
/// pixels. This is capture-time decimation; the offline reducer in
/// [`crate::geometry`] runs separately on completion.
pub const LIVE_SAMPLE_DISTANCE: f64 = 2.0;

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Rectangle,
    Ellipse,
    Line,
    Pencil,
    Eraser,
}

/// Gesture state: either nothing is happening, or exactly one shape is being
/// drawn. The in-progress shape lives here and nowhere else.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    #[default]
    Idle,
    Drawing(Shape),
}

/// Tracks the active tool, the current stroke style and the one in-progress
/// gesture.
///
/// The session never talks to the store or the network; it turns pointer
/// positions into shape geometry and hands the finished shape back to the
/// engine.
#[derive(Debug, Default)]
pub struct DrawSession {
    tool: Tool,
    style: StrokeStyle,
    state: ToolState,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Select a tool. An in-flight gesture keeps the kind it started with.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Style applied to shapes created from now on.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Drawing(_))
    }

    /// The in-progress shape, for rendering live feedback.
    pub fn current_shape(&self) -> Option<&Shape> {
        match &self.state {
            ToolState::Drawing(shape) => Some(shape),
            ToolState::Idle => None,
        }
    }

    /// Start a gesture at `position` with the given id.
    ///
    /// No-op for the eraser (erasing is discrete, handled by the engine) and
    /// while another gesture is active: the machine only leaves Idle on a
    /// pointer-down.
    pub fn begin(&mut self, id: ShapeId, position: Point) {
        if self.is_active() {
            return;
        }

        let shape = match self.tool {
            Tool::Rectangle => Shape::Rectangle(Rectangle::new(id, position, self.style.clone())),
            Tool::Ellipse => Shape::Ellipse(Ellipse::new(id, position, self.style.clone())),
            Tool::Line => Shape::Line(Line::new(id, position, self.style.clone())),
            Tool::Pencil => Shape::Pencil(Pencil::new(id, position, self.style.clone())),
            Tool::Eraser => return,
        };
        self.state = ToolState::Drawing(shape);
    }

    /// Extend the in-progress gesture to the pointer position.
    pub fn update(&mut self, position: Point, modifiers: Modifiers) {
        let ToolState::Drawing(shape) = &mut self.state else {
            return;
        };

        match shape {
            Shape::Rectangle(rect) => rect.drag_to(position),
            Shape::Ellipse(ellipse) => ellipse.drag_to(position, modifiers.any()),
            Shape::Line(line) => line.drag_to(position),
            Shape::Pencil(pencil) => {
                // Drop points the pointer barely moved to reach.
                let moved_enough = pencil
                    .points
                    .last()
                    .is_none_or(|last| (position - *last).hypot() > LIVE_SAMPLE_DISTANCE);
                if moved_enough {
                    pencil.points.push(position);
                }
            }
        }
    }

    /// Complete the gesture and return the finished shape.
    pub fn finish(&mut self) -> Option<Shape> {
        match std::mem::take(&mut self.state) {
            ToolState::Drawing(mut shape) => {
                shape.mark_complete();
                Some(shape)
            }
            ToolState::Idle => None,
        }
    }

    /// Discard any in-progress gesture.
    pub fn cancel(&mut self) {
        if let ToolState::Drawing(shape) = &self.state {
            log::debug!("Cancelled in-progress {} gesture", shape.kind().name());
        }
        self.state = ToolState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn mods() -> Modifiers {
        Modifiers::default()
    }

    #[test]
    fn test_tool_selection() {
        let mut session = DrawSession::new();
        assert_eq!(session.tool(), Tool::Rectangle);

        session.set_tool(Tool::Pencil);
        assert_eq!(session.tool(), Tool::Pencil);
    }

    #[test]
    fn test_rectangle_interaction() {
        let mut session = DrawSession::new();
        session.begin(Uuid::new_v4(), Point::new(10.0, 10.0));
        assert!(session.is_active());

        session.update(Point::new(30.0, 50.0), mods());
        let shape = session.finish().expect("finished shape");
        assert!(!session.is_active());
        assert!(shape.is_complete());

        match shape {
            Shape::Rectangle(rect) => {
                assert!((rect.width - 20.0).abs() < f64::EPSILON);
                assert!((rect.height - 40.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_ellipse_modifier_constrains_extent() {
        let mut session = DrawSession::new();
        session.set_tool(Tool::Ellipse);
        session.begin(Uuid::new_v4(), Point::new(0.0, 0.0));
        session.update(
            Point::new(40.0, -10.0),
            Modifiers { shift: true, ..Modifiers::default() },
        );

        let Some(Shape::Ellipse(ellipse)) = session.finish() else {
            panic!("expected ellipse");
        };
        assert!((ellipse.width - 40.0).abs() < f64::EPSILON);
        assert!((ellipse.height - -40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pencil_live_decimation() {
        let mut session = DrawSession::new();
        session.set_tool(Tool::Pencil);
        session.begin(Uuid::new_v4(), Point::new(0.0, 0.0));

        // Jitter under the threshold is dropped, real movement is kept.
        session.update(Point::new(1.0, 0.0), mods());
        session.update(Point::new(2.0, 0.0), mods());
        session.update(Point::new(5.0, 0.0), mods());
        session.update(Point::new(6.5, 0.0), mods());
        session.update(Point::new(9.0, 0.0), mods());

        let Some(Shape::Pencil(pencil)) = session.finish() else {
            panic!("expected pencil");
        };
        let xs: Vec<f64> = pencil.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 9.0]);
    }

    #[test]
    fn test_begin_while_drawing_is_ignored() {
        let mut session = DrawSession::new();
        let first = Uuid::new_v4();
        session.begin(first, Point::new(0.0, 0.0));
        session.begin(Uuid::new_v4(), Point::new(99.0, 99.0));

        let shape = session.finish().expect("finished shape");
        assert_eq!(shape.id(), first);
    }

    #[test]
    fn test_cancel_interaction() {
        let mut session = DrawSession::new();
        session.set_tool(Tool::Line);
        session.begin(Uuid::new_v4(), Point::new(0.0, 0.0));
        session.cancel();

        assert!(!session.is_active());
        assert_eq!(session.finish(), None);
    }

    #[test]
    fn test_eraser_never_starts_a_gesture() {
        let mut session = DrawSession::new();
        session.set_tool(Tool::Eraser);
        session.begin(Uuid::new_v4(), Point::new(0.0, 0.0));
        assert!(!session.is_active());
    }
}
