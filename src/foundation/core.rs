use crate::foundation::error::{SketchError, SketchResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Pixel dimensions of a drawing surface.
///
/// Doubles as the "authoring space" recorded on every committed stroke:
/// paths are stored against the canvas size in effect when they were drawn
/// and rescaled to the render surface at draw time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SketchResult<Self> {
        if width == 0 || height == 0 {
            return Err(SketchError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Affine mapping authoring-space coordinates onto `target`.
    pub fn scale_to(self, target: Canvas) -> Affine {
        Affine::scale_non_uniform(
            f64::from(target.width) / f64::from(self.width),
            f64::from(target.height) / f64::from(self.height),
        )
    }
}

/// Straight-alpha RGBA8 stroke color. Premultiplication happens at
/// rasterization/flatten time only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const RED: Self = Self::opaque(255, 0, 0);
    pub const GREEN: Self = Self::opaque(0, 255, 0);
    pub const YELLOW: Self = Self::opaque(255, 255, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with alpha scaled by `factor` (0..=1), used for the ghost pass.
    pub fn with_opacity(self, factor: f32) -> Self {
        let a = (f32::from(self.a) * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

/// One rasterized frame: premultiplied RGBA8, row-major, `width * height * 4` bytes.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
