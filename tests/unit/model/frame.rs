use super::*;
use crate::foundation::core::{BezPath, Canvas};
use crate::geometry::shape::ShapeKind;
use crate::model::stroke::{DrawingTool, StrokeStyle};

fn canvas() -> Canvas {
    Canvas::new(100, 100).unwrap()
}

fn pencil_stroke(n: f64) -> StrokeRecord {
    let mut path = BezPath::new();
    path.move_to((0.0, n));
    path.line_to((10.0, n));
    StrokeRecord::freehand(path, StrokeStyle::default(), DrawingTool::Pencil, canvas())
}

fn shape_stroke(start: Point, end: Point) -> StrokeRecord {
    StrokeRecord::shape(
        ShapeKind::Rectangle,
        start,
        end,
        StrokeStyle::default(),
        canvas(),
    )
}

#[test]
fn undo_redo_roundtrip_is_lossless() {
    let mut frame = Frame::new(0);
    for n in 0..5 {
        frame.commit(pencil_stroke(f64::from(n)));
    }
    let ids: Vec<_> = frame.strokes().iter().map(|s| s.id).collect();

    for _ in 0..3 {
        assert!(frame.undo());
    }
    assert_eq!(frame.strokes().len(), 2);

    while frame.redo() {}
    let restored: Vec<_> = frame.strokes().iter().map(|s| s.id).collect();
    assert_eq!(restored, ids);
}

#[test]
fn undo_and_redo_on_empty_are_noops() {
    let mut frame = Frame::new(0);
    assert!(!frame.undo());
    assert!(!frame.redo());
    assert!(!frame.can_undo());
    assert!(!frame.can_redo());
}

#[test]
fn commit_after_undo_discards_redo_history() {
    let mut frame = Frame::new(0);
    frame.commit(pencil_stroke(0.0));
    assert!(frame.undo());
    assert!(frame.can_redo());

    frame.commit(pencil_stroke(1.0));
    assert!(!frame.can_redo());
    assert!(!frame.redo());
    assert_eq!(frame.strokes().len(), 1);
}

#[test]
fn clear_redo_leaves_committed_strokes_alone() {
    let mut frame = Frame::new(0);
    frame.commit(pencil_stroke(0.0));
    frame.commit(pencil_stroke(1.0));
    assert!(frame.undo());

    frame.clear_redo();
    assert!(!frame.can_redo());
    assert_eq!(frame.strokes().len(), 1);
}

#[test]
fn clear_empties_both_buffers() {
    let mut frame = Frame::new(0);
    frame.commit(pencil_stroke(0.0));
    frame.commit(pencil_stroke(1.0));
    assert!(frame.undo());

    frame.clear();
    assert!(frame.is_empty());
    assert!(!frame.can_undo());
    assert!(!frame.can_redo());
}

#[test]
fn update_shape_handle_rebuilds_the_path() {
    let mut frame = Frame::new(0);
    let start = Point::new(0.0, 0.0);
    frame.commit(shape_stroke(start, Point::new(10.0, 10.0)));
    let id = frame.strokes()[0].id;

    let new_end = Point::new(40.0, 20.0);
    assert!(frame.update_shape_handle(id, new_end));

    let record = &frame.strokes()[0];
    assert_eq!(record.end_point, Some(new_end));
    assert_eq!(record.handle.unwrap().position, new_end);
    assert_eq!(
        record.path.elements(),
        crate::geometry::shape::build_shape_path(start, new_end, ShapeKind::Rectangle).elements()
    );
}

#[test]
fn update_shape_handle_ignores_unknown_ids_and_freehand_strokes() {
    let mut frame = Frame::new(0);
    frame.commit(pencil_stroke(0.0));
    let pencil_id = frame.strokes()[0].id;

    assert!(!frame.update_shape_handle(StrokeId(u64::MAX), Point::new(1.0, 1.0)));
    assert!(!frame.update_shape_handle(pencil_id, Point::new(1.0, 1.0)));
}

#[test]
fn duplicated_shares_no_mutable_state() {
    let mut frame = Frame::new(0);
    frame.commit(pencil_stroke(0.0));
    assert!(frame.undo());
    frame.commit(pencil_stroke(1.0));

    let copy = frame.duplicated(1);
    assert_ne!(copy.id(), frame.id());
    assert_eq!(copy.index(), 1);
    assert_eq!(copy.strokes().len(), 1);
    assert!(!copy.can_redo());

    frame.commit(pencil_stroke(2.0));
    assert_eq!(copy.strokes().len(), 1);
}
