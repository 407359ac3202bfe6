use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Point, Rect};

/// Two-point shape variants a user can place on a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Triangle];
}

/// Curve flattening tolerance for ellipse outlines.
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Builds the outline path for a two-point shape.
///
/// `start`/`end` are normalized into an axis-aligned rectangle with
/// non-negative size, so the outline is independent of drag direction.
/// Shape-handle drags call this again with the stored start point and the
/// new endpoint; the path is always rebuilt from scratch, never patched.
pub fn build_shape_path(start: Point, end: Point, kind: ShapeKind) -> BezPath {
    let rect = Rect::from_points(start, end);

    let mut path = BezPath::new();
    match kind {
        ShapeKind::Rectangle => {
            path.move_to((rect.x0, rect.y0));
            path.line_to((rect.x1, rect.y0));
            path.line_to((rect.x1, rect.y1));
            path.line_to((rect.x0, rect.y1));
            path.close_path();
        }
        ShapeKind::Circle => {
            let ellipse = kurbo::Ellipse::new(
                rect.center(),
                (rect.width() / 2.0, rect.height() / 2.0),
                0.0,
            );
            for el in ellipse.path_elements(FLATTEN_TOLERANCE) {
                path.push(el);
            }
        }
        ShapeKind::Triangle => {
            // Apex at the top mid-point, base along the bottom edge.
            path.move_to((rect.x0 + rect.width() / 2.0, rect.y0));
            path.line_to((rect.x1, rect.y1));
            path.line_to((rect.x0, rect.y1));
            path.close_path();
        }
    }

    path
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/shape.rs"]
mod tests;
