use crate::foundation::core::{BezPath, Canvas, FrameRGBA, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::model::frame::Frame;
use crate::model::stroke::StrokeRecord;

/// Opacity applied to every ghost-frame stroke.
const GHOST_OPACITY: f32 = 0.5;

/// CPU compositor turning one frame (plus an optional ghost of the previous
/// frame) into premultiplied RGBA8 pixels via `vello_cpu`.
///
/// Rendering never mutates frame state; the context is cached and reused
/// across renders of the same surface size.
#[derive(Default)]
pub struct Compositor {
    ctx: Option<vello_cpu::RenderContext>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `frame` onto a transparent surface of `surface` size.
    ///
    /// Draw order is the contract here: ghost strokes first, each at 50%
    /// color opacity, then the frame's strokes at full opacity, both in
    /// commit order. Eraser strokes compose with destination-clear and so
    /// punch through everything drawn earlier in the pass, ghost included.
    /// Paths are rescaled from their authoring space to `surface`; stroke
    /// width stays in surface space, unscaled.
    #[tracing::instrument(skip(self, frame, ghost), fields(frame = frame.index()))]
    pub fn render(
        &mut self,
        frame: &Frame,
        ghost: Option<&Frame>,
        surface: Canvas,
    ) -> SketchResult<FrameRGBA> {
        let width_u16: u16 = surface
            .width
            .try_into()
            .map_err(|_| SketchError::render("surface width exceeds u16"))?;
        let height_u16: u16 = surface
            .height
            .try_into()
            .map_err(|_| SketchError::render("surface height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        self.with_ctx_mut(width_u16, height_u16, |ctx| {
            if let Some(ghost) = ghost {
                for record in ghost.strokes() {
                    draw_stroke(ctx, record, surface, GHOST_OPACITY);
                }
            }
            for record in frame.strokes() {
                draw_stroke(ctx, record, surface, 1.0);
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
        });

        Ok(FrameRGBA {
            width: surface.width,
            height: surface.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn with_ctx_mut(&mut self, width: u16, height: u16, f: impl FnOnce(&mut vello_cpu::RenderContext)) {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        f(&mut ctx);
        self.ctx = Some(ctx);
    }
}

fn draw_stroke(
    ctx: &mut vello_cpu::RenderContext,
    record: &StrokeRecord,
    surface: Canvas,
    opacity: f32,
) {
    ctx.set_blend_mode(if record.tool.is_eraser() {
        vello_cpu::peniko::BlendMode::new(
            vello_cpu::peniko::Mix::Normal,
            vello_cpu::peniko::Compose::Clear,
        )
    } else {
        vello_cpu::peniko::BlendMode::default()
    });

    let Rgba8 { r, g, b, a } = record.style.color.with_opacity(opacity);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(record.style.line_width)
            .with_caps(vello_cpu::kurbo::Cap::Round)
            .with_join(vello_cpu::kurbo::Join::Round),
    );

    // Rescale the geometry, not the pen: line width is authored in surface
    // space and must not stretch with the canvas.
    let mut path = record.path.clone();
    path.apply_affine(record.recorded.scale_to(surface));
    ctx.stroke_path(&bezpath_to_cpu(&path));
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
