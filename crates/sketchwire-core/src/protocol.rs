//! Wire protocol for drawing rooms.
//!
//! Outbound client envelope (relayed verbatim by the room server):
//!
//! ```json
//! {"Type": "draw", "Message": {"type": "rectangle", "id": "…", "x": 10, "y": 20, …}}
//! ```
//!
//! Inbound server broadcast (extra envelope fields are ignored):
//!
//! ```json
//! {"Type": "draw", "sender": {"id": "…", "name": "…"}, "content": {…}, "timestamp": 1700000000}
//! ```
//!
//! Malformed or unknown messages are never fatal: the engine logs and drops
//! them, keeping room state exactly as it was.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::chunk::PencilChunk;
use crate::shapes::{Shape, ShapeId};

/// Errors from wire encoding and decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message could not be parsed as a known server event.
    #[error("Malformed server message: {0}")]
    Malformed(String),
    /// Event could not be serialized for the wire.
    #[error("Failed to encode client event: {0}")]
    Encode(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Events this client sends to the room server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Message", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Enter a room. Sent once by the transport when the socket opens.
    Join {
        #[serde(rename = "roomID")]
        room_id: String,
    },
    /// A completed shape (the durable record, also sent after chunks).
    Draw(Shape),
    /// One slice of a long pencil stroke.
    PencilChunk(PencilChunk),
    /// This session took back its most recent shape.
    Undo {
        #[serde(rename = "shapeID")]
        shape_id: ShapeId,
    },
    /// This session erased one of its shapes.
    Erase {
        #[serde(rename = "shapeID")]
        shape_id: ShapeId,
    },
}

/// Events the room server broadcasts to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "content", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Room history plus this session's identity; arrives once after join.
    InitialState(Snapshot),
    Draw(Shape),
    PencilChunk(PencilChunk),
    Undo {
        #[serde(rename = "shapeID")]
        shape_id: ShapeId,
    },
    Erase {
        #[serde(rename = "shapeID")]
        shape_id: ShapeId,
    },
    /// Server-side failure report; informational for the client.
    Error { error: String },
}

/// The session identity the server assigned to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub name: String,
}

/// One persisted shape record with its creator.
///
/// Persistence metadata (`roomId`, timestamps) is dropped on the floor; the
/// engine only needs the shape and who drew it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotShape {
    pub creator_id: String,
    #[serde(flatten)]
    pub shape: Shape,
}

/// Content of an `initial_state` broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// An empty room serializes its history as `null`, not `[]`.
    #[serde(default, deserialize_with = "nullable_shapes")]
    pub shapes: Vec<SnapshotShape>,
    pub user: SessionUser,
}

fn nullable_shapes<'de, D>(deserializer: D) -> Result<Vec<SnapshotShape>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse one server broadcast.
pub fn parse_server_event(raw: &str) -> ProtocolResult<ServerEvent> {
    serde_json::from_str(raw).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Serialize one client event for the wire.
pub fn encode_client_event(event: &ClientEvent) -> ProtocolResult<String> {
    serde_json::to_string(event).map_err(|e| ProtocolError::Encode(e.to_string()))
}
