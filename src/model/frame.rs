use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::Point;
use crate::geometry::shape::build_shape_path;
use crate::model::stroke::{StrokeId, StrokeRecord};

/// Stable identity of a frame, distinct from its sequence position.
///
/// `Frame::index` is a position label that the owning [`Sketch`] rewrites
/// after every structural change; anything that needs to refer to a frame
/// across mutations (selection, scroll targets) must hold a `FrameId`.
///
/// [`Sketch`]: crate::Sketch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameId(pub u64);

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

impl FrameId {
    pub fn next() -> Self {
        Self(NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One canvas's worth of committed strokes plus a linear undo buffer.
///
/// Mutation happens only through `commit`/`undo`/`redo`/`clear` and
/// `update_shape_handle`; all of them are synchronous and expect the caller
/// to serialize access (single interactive thread).
#[derive(Clone, Debug)]
pub struct Frame {
    id: FrameId,
    pub(crate) index: usize,
    committed: Vec<StrokeRecord>,
    redo_buffer: Vec<StrokeRecord>,
}

impl Frame {
    pub fn new(index: usize) -> Self {
        Self {
            id: FrameId::next(),
            index,
            committed: Vec::new(),
            redo_buffer: Vec::new(),
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Current position in the owning sequence. Not a stable identity.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn strokes(&self) -> &[StrokeRecord] {
        &self.committed
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_buffer.is_empty()
    }

    /// Appends a stroke. Any new commit invalidates the redo history.
    pub fn commit(&mut self, record: StrokeRecord) {
        self.committed.push(record);
        self.redo_buffer.clear();
    }

    /// Moves the most recent stroke into the redo buffer. Returns whether
    /// there was anything to undo.
    pub fn undo(&mut self) -> bool {
        match self.committed.pop() {
            Some(record) => {
                self.redo_buffer.push(record);
                true
            }
            None => false,
        }
    }

    /// Restores the most recently undone stroke. Returns whether there was
    /// anything to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_buffer.pop() {
            Some(record) => {
                self.committed.push(record);
                true
            }
            None => false,
        }
    }

    /// Drops the redo history without touching committed strokes.
    ///
    /// Called after every completed pointer gesture, committing or not:
    /// any finished gesture invalidates stale redo state.
    pub fn clear_redo(&mut self) {
        self.redo_buffer.clear();
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.redo_buffer.clear();
    }

    /// Rebuilds a shape stroke's path from its stored start point and a new
    /// endpoint, updating the endpoint and handle position. Returns whether
    /// a stroke changed; an absent id or a non-shape stroke is a no-op, not
    /// an error, since handles exist only for shapes.
    pub fn update_shape_handle(&mut self, stroke: StrokeId, new_end: Point) -> bool {
        let Some(record) = self.committed.iter_mut().find(|r| r.id == stroke) else {
            return false;
        };
        let Some(kind) = record.tool.shape_kind() else {
            return false;
        };
        let Some(start) = record.start_point else {
            return false;
        };

        record.path = build_shape_path(start, new_end, kind);
        record.end_point = Some(new_end);
        if let Some(handle) = record.handle.as_mut() {
            handle.position = new_end;
        }
        true
    }

    /// Deep copy with a fresh identity and an empty redo buffer; shares no
    /// mutable state with the original.
    pub fn duplicated(&self, index: usize) -> Self {
        Self {
            id: FrameId::next(),
            index,
            committed: self.committed.clone(),
            redo_buffer: Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/frame.rs"]
mod tests;
