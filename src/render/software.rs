use crate::filter::blur::EdgeMode;
use crate::filter::operations::{FilterOperations, Precision};
use crate::foundation::core::Point;
use crate::foundation::error::TesseraResult;
use crate::render::backend::{BackendCaps, BackendKind, RenderBackend};
use crate::render::composite::{CompositeMode, composite_fixed, opacity_to_u8, scale_fixed};
use crate::render::draw::{QuadDraw, QuadSource};
use crate::render::sample::yuv_to_rgba_fixed;
use crate::render::surface::Surface;

/// CPU scanline backend.
///
/// No anti-aliasing; every blend and sample runs in 8-bit fixed point so results do not depend
/// on float evaluation order.
#[derive(Debug, Default)]
pub struct SoftwareBackend;

impl SoftwareBackend {
    pub fn new() -> Self {
        Self
    }
}

fn source_fixed(source: &QuadSource<'_>, local: Point) -> [u8; 4] {
    match source {
        QuadSource::Solid(c) => c.to_array(),
        QuadSource::Texture(s) => s.rgba_fixed(local),
        QuadSource::Yuv { y, u, v, a } => yuv_to_rgba_fixed(
            y.channel_fixed(local),
            u.channel_fixed(local),
            v.channel_fixed(local),
            a.as_ref().map_or(255, |a| a.channel_fixed(local)),
        ),
    }
}

impl RenderBackend for SoftwareBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Software
    }

    fn caps(&self) -> BackendCaps {
        BackendCaps {
            anti_aliasing: false,
            max_texture_size: u32::MAX,
        }
    }

    fn draw_quad(&mut self, target: &mut Surface, draw: &QuadDraw<'_>) -> TesseraResult<()> {
        let op = opacity_to_u8(draw.opacity);
        if op == 0 && draw.mode == CompositeMode::SrcOver {
            return Ok(());
        }
        let solid = match draw.source {
            QuadSource::Solid(c) if draw.mask.is_none() => Some(scale_fixed(c.to_array(), op)),
            _ => None,
        };
        let bounds = target.bounds();
        let mut walk = draw.clone();
        walk.anti_alias = false;
        walk.for_each_pixel(bounds, |x, y, _| {
            let src = match solid {
                Some(px) => px,
                None => {
                    let Some(local) = draw.local_at(x, y) else {
                        return;
                    };
                    let mut px = scale_fixed(source_fixed(&draw.source, local), op);
                    if let Some(mask) = &draw.mask {
                        px = scale_fixed(px, mask.channel_fixed(local));
                    }
                    px
                }
            };
            composite_fixed(target.pixel_mut(x, y), src, draw.mode);
        });
        Ok(())
    }

    fn apply_filters(
        &mut self,
        target: &mut Surface,
        filters: &FilterOperations,
        edge: EdgeMode,
    ) -> TesseraResult<()> {
        filters.apply_to(
            &mut target.data,
            target.width,
            target.height,
            edge,
            Precision::Fixed,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/software.rs"]
mod tests;
