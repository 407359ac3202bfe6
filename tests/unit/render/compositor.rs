use super::*;
use crate::foundation::core::Point;
use crate::model::stroke::{DrawingTool, StrokeStyle};

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn line_stroke(from: Point, to: Point, width: f64, tool: DrawingTool, recorded: Canvas) -> StrokeRecord {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    StrokeRecord::freehand(
        path,
        StrokeStyle {
            color: Rgba8::BLACK,
            line_width: width,
        },
        tool,
        recorded,
    )
}

fn alpha_at(pixels: &FrameRGBA, x: u32, y: u32) -> u8 {
    pixels.data[((y * pixels.width + x) * 4 + 3) as usize]
}

#[test]
fn empty_frame_renders_fully_transparent() {
    let surface = canvas(16, 16);
    let frame = Frame::new(0);
    let pixels = Compositor::new().render(&frame, None, surface).unwrap();

    assert_eq!(pixels.width, 16);
    assert_eq!(pixels.height, 16);
    assert_eq!(pixels.data.len(), 16 * 16 * 4);
    assert!(pixels.data.iter().all(|&b| b == 0));
}

#[test]
fn pencil_stroke_covers_pixels_along_its_path() {
    let surface = canvas(16, 16);
    let mut frame = Frame::new(0);
    frame.commit(line_stroke(
        Point::new(0.0, 8.0),
        Point::new(16.0, 8.0),
        4.0,
        DrawingTool::Pencil,
        surface,
    ));

    let pixels = Compositor::new().render(&frame, None, surface).unwrap();
    assert_eq!(alpha_at(&pixels, 8, 8), 255);
    assert_eq!(alpha_at(&pixels, 8, 1), 0);
}

#[test]
fn eraser_clears_previously_drawn_coverage() {
    let surface = canvas(16, 16);
    let mut frame = Frame::new(0);
    frame.commit(line_stroke(
        Point::new(0.0, 8.0),
        Point::new(16.0, 8.0),
        4.0,
        DrawingTool::Pencil,
        surface,
    ));
    frame.commit(line_stroke(
        Point::new(8.0, 0.0),
        Point::new(8.0, 16.0),
        6.0,
        DrawingTool::Eraser,
        surface,
    ));

    let pixels = Compositor::new().render(&frame, None, surface).unwrap();
    // The eraser punches out the overlap; the pencil survives elsewhere.
    assert_eq!(alpha_at(&pixels, 8, 8), 0);
    assert_eq!(alpha_at(&pixels, 2, 8), 255);
}

#[test]
fn ghost_strokes_render_at_half_opacity() {
    let surface = canvas(16, 16);
    let mut ghost = Frame::new(0);
    ghost.commit(line_stroke(
        Point::new(0.0, 8.0),
        Point::new(16.0, 8.0),
        4.0,
        DrawingTool::Pencil,
        surface,
    ));
    let frame = Frame::new(1);

    let pixels = Compositor::new()
        .render(&frame, Some(&ghost), surface)
        .unwrap();
    let a = alpha_at(&pixels, 8, 8);
    assert!((118..=138).contains(&a), "ghost alpha was {a}");
}

#[test]
fn current_frame_eraser_punches_through_the_ghost() {
    let surface = canvas(16, 16);
    let mut ghost = Frame::new(0);
    ghost.commit(line_stroke(
        Point::new(0.0, 8.0),
        Point::new(16.0, 8.0),
        4.0,
        DrawingTool::Pencil,
        surface,
    ));
    let mut frame = Frame::new(1);
    frame.commit(line_stroke(
        Point::new(8.0, 0.0),
        Point::new(8.0, 16.0),
        6.0,
        DrawingTool::Eraser,
        surface,
    ));

    let pixels = Compositor::new()
        .render(&frame, Some(&ghost), surface)
        .unwrap();
    assert_eq!(alpha_at(&pixels, 8, 8), 0);
    assert!(alpha_at(&pixels, 2, 8) > 0);
}

#[test]
fn paths_rescale_from_authoring_space_to_the_surface() {
    let recorded = canvas(10, 10);
    let mut frame = Frame::new(0);
    frame.commit(line_stroke(
        Point::new(0.0, 5.0),
        Point::new(10.0, 5.0),
        2.0,
        DrawingTool::Pencil,
        recorded,
    ));

    // Rendered at 2x, the stroke lands on the scaled midline.
    let pixels = Compositor::new()
        .render(&frame, None, canvas(20, 20))
        .unwrap();
    assert_eq!(alpha_at(&pixels, 10, 10), 255);
    assert_eq!(alpha_at(&pixels, 10, 16), 0);
}

#[test]
fn stroke_order_is_commit_order() {
    let surface = canvas(8, 8);
    let mut frame = Frame::new(0);
    let mut red_path = BezPath::new();
    red_path.move_to((0.0, 4.0));
    red_path.line_to((8.0, 4.0));
    frame.commit(StrokeRecord::freehand(
        red_path,
        StrokeStyle {
            color: Rgba8::RED,
            line_width: 4.0,
        },
        DrawingTool::Pencil,
        surface,
    ));
    let mut green_path = BezPath::new();
    green_path.move_to((0.0, 4.0));
    green_path.line_to((8.0, 4.0));
    frame.commit(StrokeRecord::freehand(
        green_path,
        StrokeStyle {
            color: Rgba8::GREEN,
            line_width: 4.0,
        },
        DrawingTool::Pencil,
        surface,
    ));

    let pixels = Compositor::new().render(&frame, None, surface).unwrap();
    let idx = ((4 * pixels.width + 4) * 4) as usize;
    // Later commit wins: green over red.
    assert_eq!(pixels.data[idx], 0);
    assert_eq!(pixels.data[idx + 1], 255);
}

#[test]
fn oversized_surfaces_are_rejected() {
    let frame = Frame::new(0);
    let surface = Canvas {
        width: 100_000,
        height: 10,
    };
    assert!(Compositor::new().render(&frame, None, surface).is_err());
}
