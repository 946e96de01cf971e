use std::path::Path;

use crate::filter::blur::EdgeMode;
use crate::filter::operations::FilterOperations;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::render::draw::QuadDraw;
use crate::render::settings::RenderSettings;
use crate::render::surface::Surface;

/// Final or read-back pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8, rows tightly packed, top row first.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub(crate) fn from_surface(surface: Surface) -> Self {
        Self {
            width: surface.width,
            height: surface.height,
            data: surface.data,
            premultiplied: true,
        }
    }

    /// RGBA at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Straight-alpha copy.
    pub fn to_straight(&self) -> FrameRGBA {
        let mut data = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }

    /// Straight-alpha image for encoding.
    pub fn to_rgba_image(&self) -> TesseraResult<image::RgbaImage> {
        let straight = self.to_straight();
        image::RgbaImage::from_raw(straight.width, straight.height, straight.data)
            .ok_or_else(|| TesseraError::validation("frame buffer does not match its dimensions"))
    }

    /// Premultiplied frame from a straight-alpha image.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let mut data = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width: img.width(),
            height: img.height(),
            data,
            premultiplied: true,
        }
    }

    /// Encode as a straight-alpha PNG.
    pub fn write_png(&self, path: &Path) -> TesseraResult<()> {
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| TesseraError::Other(anyhow::anyhow!("write png '{}': {e}", path.display())))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// CPU scanline rasterizer with 8-bit fixed-point math.
    Software,
    /// Fragment-style per-pixel float pipeline with anti-aliasing.
    Hardware,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendCaps {
    pub anti_aliasing: bool,
    /// Largest target dimension the backend can render into.
    pub max_texture_size: u32,
}

/// Strategy that turns lowered quads into pixels.
pub trait RenderBackend: Send {
    fn kind(&self) -> BackendKind;

    fn caps(&self) -> BackendCaps;

    /// Rasterize one quad into `target`.
    fn draw_quad(&mut self, target: &mut Surface, draw: &QuadDraw<'_>) -> TesseraResult<()>;

    /// Run a filter pipeline over the whole surface.
    fn apply_filters(
        &mut self,
        target: &mut Surface,
        filters: &FilterOperations,
        edge: EdgeMode,
    ) -> TesseraResult<()>;
}

pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> TesseraResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Software => Ok(Box::new(crate::render::software::SoftwareBackend::new())),
        BackendKind::Hardware => {
            if !settings.hardware_available {
                return Err(TesseraError::backend_unavailable(
                    "hardware backend is disabled on this host",
                ));
            }
            Ok(Box::new(crate::render::hardware::HardwareBackend::new(
                settings.max_texture_size,
            )))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
