//! Chunked transport for pencil strokes.
//!
//! Long strokes are split into fixed-size point slices so relays and peers
//! can start painting before the full stroke has arrived. Chunks may arrive
//! in any order; the assembler buffers per stroke id and hands back the
//! finished shape once every slice is present.

use std::collections::HashMap;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::shapes::{point_pairs, Pencil, Shape, ShapeId, StrokeStyle};

/// Maximum number of points carried by a single chunk.
pub const MAX_CHUNK_POINTS: usize = 50;

/// One slice of a pencil stroke in transit.
///
/// Carries the parent stroke's anchor and style on every chunk so a receiver
/// can reconstruct the shape no matter which chunk arrives first.
/// `is_complete` marks the final slice by index, not by arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PencilChunk {
    pub id: ShapeId,
    pub chunk_index: usize,
    pub total_chunks: usize,
    #[serde(with = "point_pairs", default)]
    pub points: Vec<Point>,
    /// Anchor of the parent stroke.
    #[serde(flatten)]
    pub origin: Point,
    /// Style of the parent stroke.
    #[serde(flatten)]
    pub style: StrokeStyle,
    pub is_complete: bool,
}

/// Split a completed stroke into wire chunks of at most [`MAX_CHUNK_POINTS`]
/// points each. Short strokes yield a single chunk; an empty point list
/// yields none.
pub fn chunk_stroke(stroke: &Pencil) -> Vec<PencilChunk> {
    let total = stroke.points.len().div_ceil(MAX_CHUNK_POINTS);

    stroke
        .points
        .chunks(MAX_CHUNK_POINTS)
        .enumerate()
        .map(|(index, slice)| PencilChunk {
            id: stroke.id,
            chunk_index: index,
            total_chunks: total,
            points: slice.to_vec(),
            origin: stroke.origin,
            style: stroke.style.clone(),
            is_complete: index == total - 1,
        })
        .collect()
}

/// Slot buffer for one stroke being reassembled.
#[derive(Debug)]
struct ReassemblyBuffer {
    slots: Vec<Option<Vec<Point>>>,
    received: usize,
    origin: Point,
    style: StrokeStyle,
}

/// Reassembles pencil strokes from chunks arriving in arbitrary order.
///
/// Buffers live only while a stroke is incomplete: completion destroys the
/// buffer. There is no timer; [`ChunkAssembler::discard`] and
/// [`ChunkAssembler::clear`] are the explicit cleanup hooks for disconnects
/// and teardown.
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    buffers: HashMap<ShapeId, ReassemblyBuffer>,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk. Returns the reassembled stroke when the last missing
    /// slice arrives, `None` while slices are still outstanding.
    ///
    /// A duplicate of a still-buffered slice overwrites its slot without
    /// advancing the fill count, so duplicates can never fake completion.
    /// Chunks inconsistent with their buffer are logged and dropped.
    pub fn accept(&mut self, chunk: PencilChunk) -> Option<Shape> {
        if chunk.total_chunks == 0 || chunk.chunk_index >= chunk.total_chunks {
            log::warn!(
                "Dropping pencil chunk {}/{} for {}: index out of range",
                chunk.chunk_index,
                chunk.total_chunks,
                chunk.id
            );
            return None;
        }

        let buffer = self
            .buffers
            .entry(chunk.id)
            .or_insert_with(|| ReassemblyBuffer {
                slots: vec![None; chunk.total_chunks],
                received: 0,
                origin: chunk.origin,
                style: chunk.style.clone(),
            });

        if buffer.slots.len() != chunk.total_chunks {
            log::warn!(
                "Dropping pencil chunk for {}: totalChunks {} disagrees with buffer size {}",
                chunk.id,
                chunk.total_chunks,
                buffer.slots.len()
            );
            return None;
        }

        if buffer.slots[chunk.chunk_index].is_none() {
            buffer.received += 1;
        }
        buffer.slots[chunk.chunk_index] = Some(chunk.points);

        if buffer.received < buffer.slots.len() {
            return None;
        }

        let buffer = self.buffers.remove(&chunk.id)?;
        let points: Vec<Point> = buffer.slots.into_iter().flatten().flatten().collect();
        log::debug!(
            "Reassembled pencil stroke {} ({} points from {} chunks)",
            chunk.id,
            points.len(),
            chunk.total_chunks
        );

        Some(Shape::Pencil(Pencil::reconstruct(
            chunk.id,
            buffer.origin,
            points,
            buffer.style,
        )))
    }

    /// Drop the partial buffer for one stroke, if any.
    pub fn discard(&mut self, id: ShapeId) {
        if self.buffers.remove(&id).is_some() {
            log::debug!("Discarded partial pencil buffer for {}", id);
        }
    }

    /// Drop every partial buffer.
    pub fn clear(&mut self) {
        if !self.buffers.is_empty() {
            log::debug!("Discarding {} partial pencil buffer(s)", self.buffers.len());
            self.buffers.clear();
        }
    }

    /// Number of strokes currently mid-reassembly.
    pub fn pending(&self) -> usize {
        self.buffers.len()
    }
}
