use crate::filter::blur::EdgeMode;
use crate::filter::operations::{FilterOperations, Precision};
use crate::foundation::core::Point;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::render::backend::{BackendCaps, BackendKind, RenderBackend};
use crate::render::composite::{CompositeMode, composite_float};
use crate::render::draw::{QuadDraw, QuadSource};
use crate::render::sample::yuv_to_rgba_float;
use crate::render::surface::Surface;

/// Fragment-style backend: every covered pixel runs the same f32 program a GPU fragment shader
/// would, with edge-distance anti-aliasing.
#[derive(Debug)]
pub struct HardwareBackend {
    max_texture_size: u32,
}

impl HardwareBackend {
    pub fn new(max_texture_size: u32) -> Self {
        Self { max_texture_size }
    }

    fn check_target(&self, target: &Surface) -> TesseraResult<()> {
        if target.width > self.max_texture_size || target.height > self.max_texture_size {
            return Err(TesseraError::backend_unavailable(format!(
                "{}x{} target exceeds the {} px texture limit",
                target.width, target.height, self.max_texture_size
            )));
        }
        Ok(())
    }
}

fn shade(draw: &QuadDraw<'_>, local: Point) -> [f32; 4] {
    let color = match &draw.source {
        QuadSource::Solid(c) => c.to_array().map(|v| f32::from(v) / 255.0),
        QuadSource::Texture(s) => s.rgba_float(local),
        QuadSource::Yuv { y, u, v, a } => yuv_to_rgba_float(
            y.channel_float(local),
            u.channel_float(local),
            v.channel_float(local),
            a.as_ref().map_or(1.0, |a| a.channel_float(local)),
        ),
    };
    let mut alpha = draw.opacity.clamp(0.0, 1.0);
    if let Some(mask) = &draw.mask {
        alpha *= mask.channel_float(local);
    }
    color.map(|c| c * alpha)
}

impl RenderBackend for HardwareBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Hardware
    }

    fn caps(&self) -> BackendCaps {
        BackendCaps {
            anti_aliasing: true,
            max_texture_size: self.max_texture_size,
        }
    }

    fn draw_quad(&mut self, target: &mut Surface, draw: &QuadDraw<'_>) -> TesseraResult<()> {
        self.check_target(target)?;
        if draw.opacity <= 0.0 && draw.mode == CompositeMode::SrcOver {
            return Ok(());
        }
        let bounds = target.bounds();
        draw.for_each_pixel(bounds, |x, y, coverage| {
            let Some(local) = draw.local_at(x, y) else {
                return;
            };
            let src = shade(draw, local);
            composite_float(target.pixel_mut(x, y), src, coverage, draw.mode);
        });
        Ok(())
    }

    fn apply_filters(
        &mut self,
        target: &mut Surface,
        filters: &FilterOperations,
        edge: EdgeMode,
    ) -> TesseraResult<()> {
        self.check_target(target)?;
        filters.apply_to(
            &mut target.data,
            target.width,
            target.height,
            edge,
            Precision::Float,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/hardware.rs"]
mod tests;
