//! Sketchwire Core Library
//!
//! Client-side engine for shared drawing rooms: the shape model, the stroke
//! reduction and chunking pipeline, per-session history, and the room wire
//! protocol. Rendering backends and transports live elsewhere and talk to
//! the engine through [`CanvasEngine`].

pub mod chunk;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod protocol;
pub mod shapes;
pub mod store;
pub mod tools;

pub use chunk::{chunk_stroke, ChunkAssembler, PencilChunk, MAX_CHUNK_POINTS};
pub use engine::{CanvasEngine, IdSource, RandomIds, Scene};
pub use geometry::{reduce_stroke, MIN_SAMPLE_DISTANCE, SIMPLIFY_TOLERANCE};
pub use input::{Modifiers, PointerEvent};
pub use protocol::{
    encode_client_event, parse_server_event, ClientEvent, ProtocolError, ServerEvent, SessionUser,
    Snapshot, SnapshotShape,
};
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeTrait, StrokeStyle};
pub use store::{RemovedFrom, ShapeStore};
pub use tools::{DrawSession, Tool, ToolState};
