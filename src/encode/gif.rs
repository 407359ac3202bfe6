use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{SketchError, SketchResult};
use crate::model::frame::Frame;
use crate::render::compositor::Compositor;

/// Well-known artifact file name inside the output directory.
pub const EXPORT_FILE_NAME: &str = "draw.gif";

/// Recognized per-frame delay range, in seconds.
pub const FRAME_DELAY_MIN_SECS: f64 = 0.1;
pub const FRAME_DELAY_MAX_SECS: f64 = 3.0;

/// At most this many leading frames are encoded; longer sequences are
/// silently truncated.
pub const DEFAULT_MAX_FRAMES: usize = 100;

const DEFAULT_FRAME_DELAY_SECS: f64 = 0.25;

#[derive(Clone, Debug)]
pub struct GifConfig {
    pub out_path: PathBuf,
    pub surface: Canvas,
    /// Identical delay applied to every frame, seconds.
    pub frame_delay_secs: f64,
    /// GIF loop count; 1 plays the animation once.
    pub loop_count: u16,
    pub max_frames: usize,
}

impl GifConfig {
    pub fn validate(&self) -> SketchResult<()> {
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(SketchError::validation(
                "export surface width/height must be non-zero",
            ));
        }
        if !(FRAME_DELAY_MIN_SECS..=FRAME_DELAY_MAX_SECS).contains(&self.frame_delay_secs) {
            return Err(SketchError::validation(format!(
                "frame delay {}s outside recognized range {FRAME_DELAY_MIN_SECS}..={FRAME_DELAY_MAX_SECS}",
                self.frame_delay_secs
            )));
        }
        if self.max_frames == 0 {
            return Err(SketchError::validation("max_frames must be > 0"));
        }
        Ok(())
    }

    pub fn with_out_path(mut self, out_path: impl Into<PathBuf>) -> Self {
        self.out_path = out_path.into();
        self
    }
}

/// Config writing `draw.gif` into `out_dir` with the default animation
/// speed, play-once looping and the 100-frame window.
pub fn default_gif_config(out_dir: impl Into<PathBuf>, surface: Canvas) -> GifConfig {
    GifConfig {
        out_path: out_dir.into().join(EXPORT_FILE_NAME),
        surface,
        frame_delay_secs: DEFAULT_FRAME_DELAY_SECS,
        loop_count: 1,
        max_frames: DEFAULT_MAX_FRAMES,
    }
}

pub fn ensure_parent_dir(path: &Path) -> SketchResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Cooperative cancellation flag checked between per-frame export steps.
#[derive(Debug, Default)]
pub struct CancelToken(AtomicBool);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Encodes a frame sequence into a looping animated GIF at
/// `cfg.out_path`, rendering each frame without its ghost overlay.
///
/// The caller passes an immutable snapshot of the sequence (see
/// [`Sketch::snapshot`]); an in-flight export never observes later edits.
/// At most `cfg.max_frames` leading frames are encoded. A frame that fails
/// to rasterize is skipped; the export still succeeds if at least one
/// frame encoded. No artifact is produced on cancellation or failure.
///
/// [`Sketch::snapshot`]: crate::Sketch::snapshot
#[tracing::instrument(skip(frames, cancel), fields(frames = frames.len()))]
pub fn export_gif(
    frames: &[Frame],
    cfg: &GifConfig,
    cancel: Option<&CancelToken>,
) -> SketchResult<PathBuf> {
    cfg.validate()?;
    ensure_parent_dir(&cfg.out_path)?;

    let cancelled = || cancel.is_some_and(CancelToken::is_cancelled);
    let window = &frames[..frames.len().min(cfg.max_frames)];

    // Rasterize up front, one compositor per worker; encoding below is
    // sequential because GIF frames are order-dependent.
    let rendered: Vec<Option<FrameRGBA>> = window
        .par_iter()
        .map_init(Compositor::new, |compositor, frame| {
            if cancelled() {
                return None;
            }
            match compositor.render(frame, None, cfg.surface) {
                Ok(pixels) => Some(pixels),
                Err(err) => {
                    tracing::warn!(frame = frame.index(), %err, "skipping frame that failed to rasterize");
                    None
                }
            }
        })
        .collect();

    if cancelled() {
        return Err(SketchError::Cancelled);
    }
    if rendered.iter().all(Option::is_none) {
        return Err(SketchError::encode("no frames available to encode"));
    }

    let file = File::create(&cfg.out_path).map_err(|e| {
        SketchError::encode(format!(
            "failed to create '{}': {e}",
            cfg.out_path.display()
        ))
    })?;
    let mut encoder = image::codecs::gif::GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(image::codecs::gif::Repeat::Finite(cfg.loop_count))
        .map_err(|e| SketchError::encode(format!("failed to set gif loop count: {e}")))?;

    let delay_ms = (cfg.frame_delay_secs * 1000.0).round() as u32;
    let delay = image::Delay::from_numer_denom_ms(delay_ms, 1);

    let mut encoded = 0usize;
    for pixels in rendered.into_iter().flatten() {
        if cancelled() {
            drop(encoder);
            let _ = std::fs::remove_file(&cfg.out_path);
            return Err(SketchError::Cancelled);
        }

        let mut opaque = vec![0u8; pixels.data.len()];
        flatten_premul_over_opaque(&mut opaque, &pixels.data, [255, 255, 255])?;
        let buffer = image::RgbaImage::from_raw(pixels.width, pixels.height, opaque)
            .ok_or_else(|| SketchError::encode("frame buffer size mismatch"))?;
        encoder
            .encode_frame(image::Frame::from_parts(buffer, 0, 0, delay))
            .map_err(|e| SketchError::encode(format!("failed to encode gif frame: {e}")))?;
        encoded += 1;
    }

    tracing::debug!(encoded, out = %cfg.out_path.display(), "gif export finished");
    Ok(cfg.out_path.clone())
}

/// Composites premultiplied RGBA8 pixels over an opaque background color,
/// since GIF frames carry no partial alpha.
fn flatten_premul_over_opaque(dst: &mut [u8], src: &[u8], bg_rgb: [u8; 3]) -> SketchResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SketchError::validation(
            "flatten_premul_over_opaque expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgb[0]);
    let bg_g = u16::from(bg_rgb[1]);
    let bg_b = u16::from(bg_rgb[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (u16::from(s[0]) + mul_div255(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
