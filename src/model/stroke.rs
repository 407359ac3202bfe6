use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::{BezPath, Canvas, Point, Rgba8};
use crate::geometry::shape::{ShapeKind, build_shape_path};

/// Stable identity of a committed stroke, used for hit-testing draggable
/// handles. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StrokeId(pub u64);

static NEXT_STROKE_ID: AtomicU64 = AtomicU64::new(1);

impl StrokeId {
    pub fn next() -> Self {
        Self(NEXT_STROKE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Which instrument produced a stroke. Determines the compositing blend
/// policy (eraser clears, everything else draws over) and whether the
/// stroke carries a draggable endpoint handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DrawingTool {
    Pencil,
    Eraser,
    Shape(ShapeKind),
}

impl DrawingTool {
    pub fn is_eraser(self) -> bool {
        matches!(self, DrawingTool::Eraser)
    }

    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            DrawingTool::Shape(kind) => Some(kind),
            DrawingTool::Pencil | DrawingTool::Eraser => None,
        }
    }
}

/// Rendering attributes fixed at commit time.
///
/// This is an explicit per-commit value rather than ambient shared state,
/// so replayed edit sequences stay deterministic.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba8,
    pub line_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::BLACK,
            line_width: 1.0,
        }
    }
}

/// Draggable control point attached to a shape stroke's endpoint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Handle {
    pub position: Point,
    pub id: StrokeId,
}

/// One committed mark on a frame.
///
/// The path is stored in authoring space (`recorded`) and rescaled to the
/// render surface at draw time, so a frame renders correctly at any size.
#[derive(Clone, Debug)]
pub struct StrokeRecord {
    pub id: StrokeId,
    pub path: BezPath,
    pub style: StrokeStyle,
    pub tool: DrawingTool,
    pub recorded: Canvas,
    /// Present only for shape strokes.
    pub handle: Option<Handle>,
    /// Control points used to rebuild the shape path on handle drags.
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
}

impl StrokeRecord {
    /// Records a free-form stroke (pencil or eraser).
    pub fn freehand(path: BezPath, style: StrokeStyle, tool: DrawingTool, recorded: Canvas) -> Self {
        Self {
            id: StrokeId::next(),
            path,
            style,
            tool,
            recorded,
            handle: None,
            start_point: None,
            end_point: None,
        }
    }

    /// Records a two-point shape stroke with a draggable endpoint handle.
    pub fn shape(
        kind: ShapeKind,
        start: Point,
        end: Point,
        style: StrokeStyle,
        recorded: Canvas,
    ) -> Self {
        let id = StrokeId::next();
        Self {
            id,
            path: build_shape_path(start, end, kind),
            style,
            tool: DrawingTool::Shape(kind),
            recorded,
            handle: Some(Handle { position: end, id }),
            start_point: Some(start),
            end_point: Some(end),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/stroke.rs"]
mod tests;
