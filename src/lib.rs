//! Sketchreel is the core of a frame-based freehand drawing and animation
//! tool: vector strokes on a sequence of canvases, linear undo/redo per
//! frame, and deterministic rasterization into an animated GIF.
//!
//! # Pipeline overview
//!
//! 1. **Draw**: an input collaborator feeds points into the geometry layer
//!    ([`FreehandPath`], [`build_shape_path`]) and commits the result as a
//!    [`StrokeRecord`] on the current [`Frame`]
//! 2. **Arrange**: a [`Sketch`] owns the ordered frame sequence, the
//!    current-frame pointer and frame lifecycle (add/remove/duplicate)
//! 3. **Composite**: the [`Compositor`] renders a frame (optionally over a
//!    faint ghost of the previous frame) into premultiplied RGBA8 pixels
//!    at any surface size
//! 4. **Export**: [`export_gif`] drives the compositor across a bounded
//!    frame window and encodes a looping animated GIF
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded mutation**: frame and sketch edits are synchronous
//!   and unsynchronized; callers confine them to one interactive thread.
//!   Export reads an immutable [`Sketch::snapshot`] and may run anywhere.
//! - **Authoring-space paths**: strokes are stored against the canvas size
//!   at draw time and rescaled to the render surface, never resampled.
//! - **Premultiplied RGBA8** out of the compositor; flattening to opaque
//!   pixels happens at encode time only.
#![forbid(unsafe_code)]

mod encode;
mod foundation;
mod geometry;
mod model;
mod render;

pub use encode::gif::{
    CancelToken, DEFAULT_MAX_FRAMES, EXPORT_FILE_NAME, FRAME_DELAY_MAX_SECS, FRAME_DELAY_MIN_SECS,
    GifConfig, default_gif_config, ensure_parent_dir, export_gif,
};
pub use foundation::core::{Affine, BezPath, Canvas, FrameRGBA, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{SketchError, SketchResult};
pub use geometry::freehand::FreehandPath;
pub use geometry::shape::{ShapeKind, build_shape_path};
pub use model::frame::{Frame, FrameId};
pub use model::sketch::{Direction, Sketch};
pub use model::stroke::{DrawingTool, Handle, StrokeId, StrokeRecord, StrokeStyle};
pub use render::compositor::Compositor;
