use crate::foundation::core::{BezPath, Point};

/// Incremental builder for a free-form stroke path.
///
/// The input collaborator feeds pointer positions in as they arrive:
/// `start` anchors the path, each `line_to` extends it by one segment, and
/// `finish` yields the completed path for committing. A `line_to` before
/// `start` anchors the path instead of drawing a segment, so a gesture that
/// skips its start event still produces a usable path.
#[derive(Clone, Debug, Default)]
pub struct FreehandPath {
    path: BezPath,
    anchored: bool,
}

impl FreehandPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, at: Point) {
        self.path = BezPath::new();
        self.path.move_to(at);
        self.anchored = true;
    }

    pub fn line_to(&mut self, to: Point) {
        if !self.anchored {
            self.start(to);
            return;
        }
        self.path.line_to(to);
    }

    pub fn is_empty(&self) -> bool {
        self.path.elements().len() < 2
    }

    /// Consumes the builder, returning the accumulated path.
    pub fn finish(self) -> BezPath {
        self.path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/freehand.rs"]
mod tests;
