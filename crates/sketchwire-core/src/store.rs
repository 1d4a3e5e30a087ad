//! Shape storage partitioned by authorship.

use kurbo::Point;

use crate::shapes::{Shape, ShapeId};

/// Which collection shed a shape in [`ShapeStore::remove_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovedFrom {
    Local,
    Remote,
}

/// Completed shapes for one room, split into what this session drew and what
/// arrived from peers.
///
/// The two collections are disjoint by construction and both keep insertion
/// order, which doubles as paint order. Only local shapes ever enter the
/// undo stack, and only whole shapes move through it: undo pops the newest
/// local shape aside, redo pushes it straight back.
#[derive(Debug, Default)]
pub struct ShapeStore {
    local: Vec<Shape>,
    remote: Vec<Shape>,
    undone: Vec<Shape>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mutation ---

    /// Append a shape this session finished drawing.
    /// Any pending redo history is invalidated by the new action.
    pub fn push_local(&mut self, shape: Shape) {
        self.undone.clear();
        self.local.push(shape);
    }

    /// Append a shape received from a peer.
    pub fn add_remote(&mut self, shape: Shape) {
        self.remote.push(shape);
    }

    /// Add a peer shape, replacing any earlier copy with the same id in
    /// place. Chunked strokes arrive twice (reassembled, then as the durable
    /// draw record) and must not paint twice.
    pub fn upsert_remote(&mut self, shape: Shape) {
        if let Some(existing) = self.remote.iter_mut().find(|s| s.id() == shape.id()) {
            log::debug!("Replacing remote shape {}", shape.id());
            *existing = shape;
        } else {
            self.add_remote(shape);
        }
    }

    /// Remove a shape wherever it lives. Returns which collection reported
    /// the removal, remote taking precedence if the id somehow appears twice.
    pub fn remove_by_id(&mut self, id: ShapeId) -> Option<RemovedFrom> {
        let in_remote = self.remote.iter().position(|s| s.id() == id);
        if let Some(index) = in_remote {
            self.remote.remove(index);
        }
        let in_local = self.local.iter().position(|s| s.id() == id);
        if let Some(index) = in_local {
            self.local.remove(index);
        }

        match (in_remote, in_local) {
            (Some(_), _) => {
                log::debug!("Removed remote shape {}", id);
                Some(RemovedFrom::Remote)
            }
            (None, Some(_)) => {
                log::debug!("Removed local shape {}", id);
                Some(RemovedFrom::Local)
            }
            (None, None) => None,
        }
    }

    /// Pop the most recent local shape onto the redo stack.
    pub fn undo(&mut self) -> Option<ShapeId> {
        let shape = self.local.pop()?;
        let id = shape.id();
        self.undone.push(shape);
        log::debug!("Undid local shape {}", id);
        Some(id)
    }

    /// Restore the most recently undone shape to the local collection.
    pub fn redo(&mut self) -> Option<ShapeId> {
        let shape = self.undone.pop()?;
        let id = shape.id();
        self.local.push(shape);
        log::debug!("Redid local shape {}", id);
        Some(id)
    }

    /// Drop both collections. The undo stack survives, so a cleared shape
    /// popped earlier can still be redone.
    pub fn clear(&mut self) {
        self.local.clear();
        self.remote.clear();
    }

    /// Replace both collections from persisted records, partitioning each
    /// shape by whether `current_user` created it. Resets the undo stack.
    pub fn load_snapshot(&mut self, records: Vec<(String, Shape)>, current_user: &str) {
        let mut local = Vec::new();
        let mut remote = Vec::new();

        for (creator, mut shape) in records {
            shape.mark_complete();
            if creator == current_user {
                local.push(shape);
            } else {
                remote.push(shape);
            }
        }

        log::info!(
            "Loaded {} local and {} remote shape(s) from snapshot",
            local.len(),
            remote.len()
        );

        self.local = local;
        self.remote = remote;
        self.undone.clear();
    }

    // --- Queries ---

    /// Topmost local shape under the point, if any. Remote shapes are never
    /// candidates: sessions only erase what they drew.
    pub fn hit_local(&self, point: Point) -> Option<ShapeId> {
        self.local
            .iter()
            .rev()
            .find(|shape| shape.hit_test(point))
            .map(|shape| shape.id())
    }

    pub fn local(&self) -> &[Shape] {
        &self.local
    }

    pub fn remote(&self) -> &[Shape] {
        &self.remote
    }

    /// All completed shapes, local first (the original draw order).
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.local.iter().chain(self.remote.iter())
    }

    pub fn can_undo(&self) -> bool {
        !self.local.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.remote.is_empty()
    }
}
