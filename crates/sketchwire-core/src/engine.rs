//! Engine facade: one object per canvas that owns all drawing state.
//!
//! The embedder feeds it pointer events and raw server messages, drains its
//! outgoing queue into the transport, and hands its [`Scene`] to the
//! renderer every frame. Everything inside runs on one logical thread; each
//! call finishes before the next frame can observe the state.

use kurbo::Point;
use uuid::Uuid;

use crate::chunk::{chunk_stroke, ChunkAssembler};
use crate::geometry::reduce_stroke;
use crate::input::{Modifiers, PointerEvent};
use crate::protocol::{parse_server_event, ClientEvent, ServerEvent};
use crate::shapes::{Shape, ShapeId, StrokeStyle};
use crate::store::ShapeStore;
use crate::tools::{DrawSession, Tool};

/// Capability that mints shape ids.
///
/// Injected so tests (and replay tooling) can use deterministic ids instead
/// of random UUIDs.
pub trait IdSource {
    fn next_id(&mut self) -> ShapeId;
}

/// Default id source backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> ShapeId {
        Uuid::new_v4()
    }
}

/// Borrowed view of everything one frame paints, in paint order.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Shapes this session drew.
    pub local: &'a [Shape],
    /// Shapes received from peers.
    pub remote: &'a [Shape],
    /// The live gesture, painted last.
    pub in_progress: Option<&'a Shape>,
    /// Shape the eraser is hovering, for highlight feedback.
    pub highlighted: Option<ShapeId>,
}

/// Client-side drawing engine for one room.
pub struct CanvasEngine {
    store: ShapeStore,
    assembler: ChunkAssembler,
    session: DrawSession,
    ids: Box<dyn IdSource>,
    /// Pending outgoing events, drained by the transport.
    outgoing: Vec<ClientEvent>,
    /// Local shape under the eraser, if the eraser tool is active.
    hovered: Option<ShapeId>,
    /// Session identity, known once `initial_state` arrives.
    user_id: Option<String>,
    last_error: Option<String>,
}

impl CanvasEngine {
    pub fn new() -> Self {
        Self::with_ids(Box::new(RandomIds))
    }

    /// Create an engine with a custom id source.
    pub fn with_ids(ids: Box<dyn IdSource>) -> Self {
        Self {
            store: ShapeStore::new(),
            assembler: ChunkAssembler::new(),
            session: DrawSession::new(),
            ids,
            outgoing: Vec::new(),
            hovered: None,
            user_id: None,
            last_error: None,
        }
    }

    // --- Tool and style ---

    pub fn tool(&self) -> Tool {
        self.session.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.session.set_tool(tool);
        if tool != Tool::Eraser {
            self.hovered = None;
        }
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.session.set_style(style);
    }

    // --- Pointer input ---

    /// Dispatch a pointer event to the matching handler.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move {
                position,
                modifiers,
            } => self.pointer_move(position, modifiers),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    pub fn pointer_down(&mut self, position: Point) {
        match self.session.tool() {
            Tool::Eraser => self.erase_at(position),
            _ => {
                if !self.session.is_active() {
                    let id = self.ids.next_id();
                    self.session.begin(id, position);
                }
            }
        }
    }

    pub fn pointer_move(&mut self, position: Point, modifiers: Modifiers) {
        if self.session.is_active() {
            self.session.update(position, modifiers);
        } else if self.session.tool() == Tool::Eraser {
            self.hovered = self.store.hit_local(position);
        }
    }

    pub fn pointer_up(&mut self) {
        self.complete_gesture();
    }

    /// The pointer left the canvas: finish like a pointer-up so the gesture
    /// cannot keep growing off-surface, and drop any hover highlight.
    pub fn pointer_leave(&mut self) {
        self.complete_gesture();
        self.hovered = None;
    }

    fn complete_gesture(&mut self) {
        let Some(shape) = self.session.finish() else {
            return;
        };

        match shape {
            Shape::Pencil(mut pencil) => {
                let raw_len = pencil.points.len();
                pencil.points = reduce_stroke(&pencil.points);
                let chunks = chunk_stroke(&pencil);
                log::debug!(
                    "Completed pencil stroke {}: {} -> {} points, {} chunk(s)",
                    pencil.id,
                    raw_len,
                    pencil.points.len(),
                    chunks.len()
                );

                for chunk in chunks {
                    self.outgoing.push(ClientEvent::PencilChunk(chunk));
                }
                let shape = Shape::Pencil(pencil);
                self.outgoing.push(ClientEvent::Draw(shape.clone()));
                self.store.push_local(shape);
            }
            shape => {
                self.outgoing.push(ClientEvent::Draw(shape.clone()));
                self.store.push_local(shape);
            }
        }
    }

    fn erase_at(&mut self, position: Point) {
        if let Some(id) = self.store.hit_local(position) {
            self.store.remove_by_id(id);
            self.hovered = None;
            self.outgoing.push(ClientEvent::Erase { shape_id: id });
        }
    }

    // --- History ---

    /// Take back this session's most recent shape and tell the room.
    pub fn undo(&mut self) {
        if let Some(id) = self.store.undo() {
            self.outgoing.push(ClientEvent::Undo { shape_id: id });
        }
    }

    /// Restore the most recently undone shape. Local only: peers dropped the
    /// shape on undo and are not told about the restore.
    pub fn redo(&mut self) {
        self.store.redo();
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    // --- Server events ---

    /// Parse and apply one raw server message. Malformed input is logged and
    /// dropped; room state is never corrupted by it.
    pub fn handle_message(&mut self, raw: &str) {
        match parse_server_event(raw) {
            Ok(event) => self.apply_server_event(event),
            Err(err) => log::warn!("Failed to parse server message: {}", err),
        }
    }

    /// Apply one already-parsed server event.
    pub fn apply_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::InitialState(snapshot) => {
                let user_id = snapshot.user.user_id;
                log::info!("Joined room as {} ({})", snapshot.user.name, user_id);

                let records = snapshot
                    .shapes
                    .into_iter()
                    .map(|record| (record.creator_id, record.shape))
                    .collect();
                self.store.load_snapshot(records, &user_id);
                self.user_id = Some(user_id);
            }
            ServerEvent::Draw(shape) => {
                // The durable record may duplicate a stroke already
                // reassembled from chunks; replace rather than double-paint.
                self.store.upsert_remote(shape);
            }
            ServerEvent::PencilChunk(chunk) => {
                if let Some(shape) = self.assembler.accept(chunk) {
                    self.store.upsert_remote(shape);
                }
            }
            ServerEvent::Undo { shape_id } | ServerEvent::Erase { shape_id } => {
                if self.store.remove_by_id(shape_id).is_none() {
                    log::debug!("Removal for unknown shape {}", shape_id);
                }
                self.assembler.discard(shape_id);
                if self.hovered == Some(shape_id) {
                    self.hovered = None;
                }
            }
            ServerEvent::Error { error } => {
                log::error!("Server error: {}", error);
                self.last_error = Some(error);
            }
        }
    }

    // --- Embedder surface ---

    /// Drain pending outgoing events for the transport, in send order.
    pub fn take_outgoing(&mut self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.outgoing)
    }

    /// Most recent server error, if any, clearing it.
    pub fn take_last_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Everything the current frame should paint.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            local: self.store.local(),
            remote: self.store.remote(),
            in_progress: self.session.current_shape(),
            highlighted: self.hovered,
        }
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    /// Session user id assigned by the server, once known.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Drop every shape and any in-progress gesture, keeping the room
    /// connection and undo history.
    pub fn clear(&mut self) {
        self.session.cancel();
        self.store.clear();
        self.hovered = None;
    }

    /// Teardown: discard the live gesture, partial reassembly buffers and
    /// unsent events. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.session.cancel();
        self.assembler.clear();
        self.outgoing.clear();
        self.hovered = None;
        log::debug!("Canvas engine shut down");
    }
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::MAX_CHUNK_POINTS;
    use crate::shapes::ShapeTrait;

    /// Deterministic id source: 1, 2, 3, …
    struct SeqIds(u128);

    impl IdSource for SeqIds {
        fn next_id(&mut self) -> ShapeId {
            self.0 += 1;
            Uuid::from_u128(self.0)
        }
    }

    fn engine() -> CanvasEngine {
        CanvasEngine::with_ids(Box::new(SeqIds(0)))
    }

    fn mods() -> Modifiers {
        Modifiers::default()
    }

    fn drag_rect(engine: &mut CanvasEngine, from: (f64, f64), to: (f64, f64)) {
        engine.pointer_down(Point::new(from.0, from.1));
        engine.pointer_move(Point::new(to.0, to.1), mods());
        engine.pointer_up();
    }

    #[test]
    fn test_rectangle_drag_produces_draw_event() {
        let mut engine = engine();
        drag_rect(&mut engine, (0.0, 0.0), (30.0, 20.0));

        assert_eq!(engine.store().local().len(), 1);
        let local = engine.store().local()[0].clone();
        assert!(local.is_complete());
        assert_eq!(local.id(), Uuid::from_u128(1));

        let outgoing = engine.take_outgoing();
        assert_eq!(outgoing.len(), 1);
        match &outgoing[0] {
            ClientEvent::Draw(shape) => assert_eq!(shape.id(), local.id()),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(engine.take_outgoing().is_empty());
    }

    #[test]
    fn test_pencil_completion_chunks_then_draw() {
        let mut engine = engine();
        engine.set_tool(Tool::Pencil);

        // Zigzag so the reducer keeps enough points for several chunks.
        engine.pointer_down(Point::new(0.0, 0.0));
        for i in 1..240 {
            let y = if i % 2 == 0 { 0.0 } else { 6.0 };
            engine.pointer_move(Point::new(i as f64 * 3.0, y), mods());
        }
        engine.pointer_up();

        let stored = match &engine.store().local()[0] {
            Shape::Pencil(p) => p.clone(),
            other => panic!("unexpected shape {other:?}"),
        };
        assert!(stored.points.len() > MAX_CHUNK_POINTS);

        let outgoing = engine.take_outgoing();
        let expected_chunks = stored.points.len().div_ceil(MAX_CHUNK_POINTS);
        assert_eq!(outgoing.len(), expected_chunks + 1);

        // Chunks first, durable draw last; reassembling our own chunks
        // reproduces the stored stroke exactly.
        let mut assembler = ChunkAssembler::new();
        let mut reassembled = None;
        for event in &outgoing[..expected_chunks] {
            let ClientEvent::PencilChunk(chunk) = event else {
                panic!("expected chunk, got {event:?}");
            };
            if let Some(shape) = assembler.accept(chunk.clone()) {
                reassembled = Some(shape);
            }
        }
        match reassembled {
            Some(Shape::Pencil(p)) => assert_eq!(p.points, stored.points),
            other => panic!("chunks did not reassemble: {other:?}"),
        }
        match &outgoing[expected_chunks] {
            ClientEvent::Draw(shape) => assert_eq!(shape.id(), stored.id()),
            other => panic!("expected trailing draw, got {other:?}"),
        }
    }

    #[test]
    fn test_eraser_removes_local_only_and_reports() {
        let mut engine = engine();
        drag_rect(&mut engine, (0.0, 0.0), (20.0, 20.0));
        let local_id = engine.store().local()[0].id();
        engine.take_outgoing();

        // A remote twin covering the same area.
        engine.handle_message(
            r##"{"Type":"draw","content":{"type":"rectangle",
                "id":"9a1b2c3d-4e5f-4a8c-9f6e-0b1c2d3e4f5a",
                "x":0,"y":0,"width":20,"height":20,
                "color":"#000000","strokeWidth":2,"isComplete":true}}"##,
        );

        engine.set_tool(Tool::Eraser);
        engine.pointer_down(Point::new(10.0, 10.0));

        assert!(engine.store().local().is_empty());
        assert_eq!(engine.store().remote().len(), 1);

        let outgoing = engine.take_outgoing();
        assert_eq!(
            outgoing,
            vec![ClientEvent::Erase {
                shape_id: local_id
            }]
        );

        // Nothing local left under the pointer: erasing again is a no-op.
        engine.pointer_down(Point::new(10.0, 10.0));
        assert!(engine.take_outgoing().is_empty());
    }

    #[test]
    fn test_eraser_hover_highlight() {
        let mut engine = engine();
        drag_rect(&mut engine, (0.0, 0.0), (20.0, 20.0));
        let id = engine.store().local()[0].id();

        engine.set_tool(Tool::Eraser);
        engine.pointer_move(Point::new(10.0, 10.0), mods());
        assert_eq!(engine.scene().highlighted, Some(id));

        engine.pointer_move(Point::new(100.0, 100.0), mods());
        assert_eq!(engine.scene().highlighted, None);

        // Switching back to a drawing tool drops the highlight too.
        engine.pointer_move(Point::new(10.0, 10.0), mods());
        engine.set_tool(Tool::Rectangle);
        assert_eq!(engine.scene().highlighted, None);
    }

    #[test]
    fn test_undo_notifies_room_redo_does_not() {
        let mut engine = engine();
        drag_rect(&mut engine, (0.0, 0.0), (10.0, 10.0));
        drag_rect(&mut engine, (20.0, 20.0), (30.0, 30.0));
        let second = engine.store().local()[1].id();
        engine.take_outgoing();

        engine.undo();
        assert_eq!(
            engine.take_outgoing(),
            vec![ClientEvent::Undo { shape_id: second }]
        );
        assert_eq!(engine.store().local().len(), 1);

        engine.redo();
        assert_eq!(engine.store().local().len(), 2);
        assert!(engine.take_outgoing().is_empty());

        // Undo on an empty store says nothing.
        engine.undo();
        engine.undo();
        engine.undo();
        assert_eq!(engine.take_outgoing().len(), 2);
    }

    #[test]
    fn test_initial_state_partitions_and_sets_identity() {
        let mut engine = engine();
        engine.handle_message(
            r##"{"Type":"initial_state","content":{
                "shapes":[
                    {"type":"rectangle","id":"7f2c1f6e-51f6-4a8c-9f6e-0b1c2d3e4f5a",
                     "creatorId":"u-1","x":0,"y":0,"width":10,"height":10,
                     "color":"#000000","strokeWidth":2},
                    {"type":"line","id":"9a1b2c3d-4e5f-4a8c-9f6e-0b1c2d3e4f5a",
                     "creatorId":"u-2","x":0,"y":0,"endX":5,"endY":5,
                     "color":"#ff0000","strokeWidth":1}
                ],
                "user":{"userID":"u-1","name":"ada"}}}"##,
        );

        assert_eq!(engine.user_id(), Some("u-1"));
        assert_eq!(engine.store().local().len(), 1);
        assert_eq!(engine.store().remote().len(), 1);
        assert!(engine.store().local()[0].is_complete());
    }

    #[test]
    fn test_remote_chunks_then_draw_paint_once() {
        let mut engine = engine();
        let id = "3e0c7f6e-51f6-4a8c-9f6e-0b1c2d3e4f5a";

        let chunk = |index: usize, points: &str, complete: bool| {
            format!(
                r##"{{"Type":"pencil_chunk","content":{{"id":"{id}",
                    "chunkIndex":{index},"totalChunks":2,"points":{points},
                    "x":0,"y":0,"color":"#000000","strokeWidth":2,
                    "isComplete":{complete}}}}}"##
            )
        };

        // Out of order: second slice first.
        engine.handle_message(&chunk(1, "[[60,0],[70,0]]", true));
        assert!(engine.store().remote().is_empty());
        engine.handle_message(&chunk(0, "[[0,0],[50,0]]", false));
        assert_eq!(engine.store().remote().len(), 1);

        match &engine.store().remote()[0] {
            Shape::Pencil(p) => assert_eq!(p.points.len(), 4),
            other => panic!("unexpected shape {other:?}"),
        }

        // The durable draw for the same stroke must not double-paint.
        engine.handle_message(&format!(
            r##"{{"Type":"draw","content":{{"type":"pencil","id":"{id}",
                "x":0,"y":0,"points":[[0,0],[50,0],[60,0],[70,0]],
                "color":"#000000","strokeWidth":2,"isComplete":true}}}}"##
        ));
        assert_eq!(engine.store().remote().len(), 1);
    }

    #[test]
    fn test_remote_removals() {
        let mut engine = engine();
        engine.handle_message(
            r##"{"Type":"draw","content":{"type":"ellipse",
                "id":"9a1b2c3d-4e5f-4a8c-9f6e-0b1c2d3e4f5a",
                "x":0,"y":0,"width":10,"height":10,
                "color":"#000000","strokeWidth":2,"isComplete":true}}"##,
        );
        assert_eq!(engine.store().remote().len(), 1);

        engine.handle_message(
            r##"{"Type":"undo","content":{"shapeID":"9a1b2c3d-4e5f-4a8c-9f6e-0b1c2d3e4f5a"}}"##,
        );
        assert!(engine.store().remote().is_empty());

        // Erase for an id nobody has is harmless.
        engine.handle_message(
            r##"{"Type":"erase","content":{"shapeID":"9a1b2c3d-4e5f-4a8c-9f6e-0b1c2d3e4f5a"}}"##,
        );
    }

    #[test]
    fn test_malformed_messages_leave_state_untouched() {
        let mut engine = engine();
        drag_rect(&mut engine, (0.0, 0.0), (10.0, 10.0));

        engine.handle_message("garbage");
        engine.handle_message(r#"{"Type":"cursor_move","content":{"x":1}}"#);
        engine.handle_message(r#"{"Type":"draw","content":{"type":"rectangle"}}"#);

        assert_eq!(engine.store().local().len(), 1);
        assert!(engine.store().remote().is_empty());
    }

    #[test]
    fn test_server_error_is_surfaced_once() {
        let mut engine = engine();
        engine.handle_message(r##"{"Type":"error","content":{"error":"room is full"}}"##);
        assert_eq!(engine.take_last_error().as_deref(), Some("room is full"));
        assert_eq!(engine.take_last_error(), None);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut engine = engine();
        engine.set_tool(Tool::Pencil);
        engine.pointer_down(Point::new(0.0, 0.0));

        engine.handle_message(
            r##"{"Type":"pencil_chunk","content":{
                "id":"3e0c7f6e-51f6-4a8c-9f6e-0b1c2d3e4f5a",
                "chunkIndex":0,"totalChunks":3,"points":[[1,1]],
                "x":0,"y":0,"color":"#000000","strokeWidth":2,"isComplete":false}}"##,
        );

        engine.shutdown();
        assert!(engine.scene().in_progress.is_none());
        assert!(engine.take_outgoing().is_empty());

        engine.shutdown();
        engine.shutdown();
    }

    #[test]
    fn test_clear_drops_shapes_and_gesture() {
        let mut engine = engine();
        drag_rect(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.pointer_down(Point::new(50.0, 50.0));
        assert!(engine.scene().in_progress.is_some());

        engine.clear();
        assert!(engine.store().local().is_empty());
        assert!(engine.scene().in_progress.is_none());
    }
}
