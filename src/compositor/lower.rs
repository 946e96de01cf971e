//! Lowering scene quads into backend draws for one target buffer.

use std::collections::HashMap;

use crate::filter::blur::EdgeMode;
use crate::filter::operations::FilterOperations;
use crate::foundation::core::Rect;
use crate::foundation::error::{SceneError, TesseraResult};
use crate::foundation::ids::{RenderPassId, ResourceId};
use crate::geometry::quad::DeviceQuad;
use crate::geometry::rect::{Offset, RectI, Size};
use crate::geometry::transform::{Homography, Transform};
use crate::render::backend::RenderBackend;
use crate::render::composite::CompositeMode;
use crate::render::draw::{QuadDraw, QuadSource};
use crate::render::picture::rasterize_picture;
use crate::render::sample::{Sampler, TexMap};
use crate::render::surface::Surface;
use crate::resource::provider::{ResourceFormat, ResourceProvider, Texels};
use crate::scene::pass::{RenderPass, SharedQuadState};
use crate::scene::quad::{DrawQuad, QuadMaterial, RenderPassQuad};

/// A finished pass buffer, owned by the resource provider until the frame ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PassBuffer {
    pub(crate) resource: ResourceId,
    /// The pass's output rect inside the buffer; the rest is margin.
    pub(crate) content: RectI,
}

/// What quads of one pass need while being lowered.
pub(crate) struct Lowering<'a> {
    pub(crate) backend: &'a mut dyn RenderBackend,
    pub(crate) provider: &'a ResourceProvider,
    pub(crate) buffers: &'a HashMap<RenderPassId, PassBuffer>,
}

/// Device-space footprint of a quad inside one target.
#[derive(Clone, Debug)]
struct Placement {
    quad: DeviceQuad,
    to_local: Homography,
    clip: RectI,
    anti_alias: bool,
}

impl Placement {
    fn draw<'a>(
        &self,
        opacity: f32,
        source: QuadSource<'a>,
        mask: Option<Sampler<'a>>,
    ) -> QuadDraw<'a> {
        QuadDraw {
            quad: self.quad.clone(),
            to_local: self.to_local,
            clip: self.clip,
            opacity,
            anti_alias: self.anti_alias,
            source,
            mask,
            mode: CompositeMode::SrcOver,
        }
    }
}

/// `uv` in 0..1 scaled to texels of `size`.
fn texel_rect(uv: Rect, size: Size) -> Rect {
    let (w, h) = (f64::from(size.width), f64::from(size.height));
    Rect::new(uv.x0 * w, uv.y0 * h, uv.x1 * w, uv.y1 * h)
}

fn extent(width: u32, height: u32) -> Rect {
    Rect::new(0.0, 0.0, f64::from(width), f64::from(height))
}

/// Project the quad into the buffer whose pixel (0, 0) sits at `origin` in pass target space.
///
/// `None` when nothing would be drawn: an empty visible rect, a singular transform, or geometry
/// entirely behind the eye.
fn place(
    sqs: &SharedQuadState,
    quad: &DrawQuad,
    target: RectI,
    origin: Offset,
    anti_alias: bool,
) -> Option<Placement> {
    let visible = quad.visible_rect.intersect(quad.rect);
    if visible.is_empty() {
        return None;
    }
    let device = Transform::translation(-f64::from(origin.x), -f64::from(origin.y))
        .concat(&sqs.content_to_target_transform);
    let h = device.homography();
    let to_local = h.inverse()?;
    let projected = DeviceQuad::project(visible.to_rect(), &h)?;

    let mut clip = target;
    if sqs.is_clipped {
        // A clip that cannot be expressed in target space covers nothing there.
        clip = origin
            .checked_neg()
            .and_then(|o| sqs.clip_rect.checked_offset(o))
            .map_or(RectI::default(), |c| clip.intersect(c));
    }
    if clip.is_empty() {
        return None;
    }
    let (quad, anti_alias) = if projected.is_pixel_aligned() {
        (projected.snapped(), false)
    } else {
        (projected, anti_alias)
    };
    Some(Placement {
        quad,
        to_local,
        clip,
        anti_alias,
    })
}

/// Lower and draw quad `index` of `pass` into `target`. Returns whether anything was submitted.
pub(crate) fn draw_quad(
    cx: &mut Lowering<'_>,
    pass: &RenderPass,
    index: usize,
    target: &mut Surface,
    origin: Offset,
) -> TesseraResult<bool> {
    let Some(quad) = pass.quad_list.get(index) else {
        return Ok(false);
    };
    let sqs = pass
        .shared_quad_state_list
        .get(quad.shared_quad_state)
        .ok_or(SceneError::SharedQuadStateOutOfRange {
            pass: pass.id,
            quad: index,
            index: quad.shared_quad_state,
            len: pass.shared_quad_state_list.len(),
        })?;
    let force_off = matches!(&quad.material, QuadMaterial::SolidColor(s) if s.force_anti_aliasing_off);
    let anti_alias = cx.backend.caps().anti_aliasing && !force_off;
    let Some(placement) = place(sqs, quad, target.bounds(), origin, anti_alias) else {
        return Ok(false);
    };
    let opacity = sqs.effective_opacity();
    let local = quad.rect.to_rect();

    match &quad.material {
        QuadMaterial::SolidColor(s) => {
            let draw = placement.draw(opacity, QuadSource::Solid(s.color), None);
            cx.backend.draw_quad(target, &draw)?;
        }
        QuadMaterial::Texture(t) => {
            let texels = cx.provider.texels(t.resource_id)?;
            let map = TexMap {
                local,
                texel: texel_rect(t.uv_rect, texels.size),
            };
            let mut sampler = Sampler::new(texels, map);
            sampler.premultiply = !t.premultiplied_alpha;
            let draw = placement.draw(opacity, QuadSource::Texture(sampler), None);
            cx.backend.draw_quad(target, &draw)?;
        }
        QuadMaterial::YuvVideo(v) => {
            let y = cx.provider.texels(v.y_plane)?;
            let size = if v.tex_size.is_empty() {
                y.size
            } else {
                v.tex_size
            };
            let full = TexMap {
                local,
                texel: extent(size.width, size.height),
            };
            let chroma = TexMap {
                local,
                texel: extent(size.width.div_ceil(2), size.height.div_ceil(2)),
            };
            let a = match v.a_plane {
                Some(id) => Some(Sampler::new(cx.provider.texels(id)?, full)),
                None => None,
            };
            let source = QuadSource::Yuv {
                y: Sampler::new(y, full),
                u: Sampler::new(cx.provider.texels(v.u_plane)?, chroma),
                v: Sampler::new(cx.provider.texels(v.v_plane)?, chroma),
                a,
            };
            let draw = placement.draw(opacity, source, None);
            cx.backend.draw_quad(target, &draw)?;
        }
        QuadMaterial::Picture(p) => {
            let raster = rasterize_picture(p)?;
            let texels = Texels {
                size: raster.size,
                format: raster.format,
                data: &raster.data,
            };
            let map = TexMap {
                local,
                texel: p.tex_coord_rect,
            };
            let draw = placement.draw(opacity, QuadSource::Texture(Sampler::new(texels, map)), None);
            cx.backend.draw_quad(target, &draw)?;
        }
        QuadMaterial::RenderPass(rp) => {
            draw_render_pass(cx, pass.id, rp, &placement, local, opacity, target)?;
        }
    }
    Ok(true)
}

fn draw_render_pass(
    cx: &mut Lowering<'_>,
    owner: RenderPassId,
    rp: &RenderPassQuad,
    placement: &Placement,
    local: Rect,
    opacity: f32,
    target: &mut Surface,
) -> TesseraResult<()> {
    let buffer = *cx
        .buffers
        .get(&rp.render_pass_id)
        .ok_or(SceneError::DanglingPassReference {
            pass: owner,
            referenced: rp.render_pass_id,
        })?;

    if !rp.background_filters.is_empty() {
        filter_backdrop(cx.backend, target, placement, &rp.background_filters)?;
    }

    let mut texels = cx.provider.texels(buffer.resource)?;
    let filters = rp.foreground_filters();
    let filtered;
    if !filters.is_empty() {
        let mut copy =
            Surface::from_pixels(texels.size.width, texels.size.height, texels.data.to_vec())?;
        cx.backend
            .apply_filters(&mut copy, &filters, EdgeMode::Transparent)?;
        filtered = copy;
        texels = Texels {
            size: filtered.size(),
            format: ResourceFormat::Rgba8,
            data: &filtered.data,
        };
    }

    let content = Sampler::new(
        texels,
        TexMap {
            local,
            texel: buffer.content.to_rect(),
        },
    );
    let mask = match rp.mask_resource_id {
        Some(id) => {
            let m = cx.provider.texels(id)?;
            let map = TexMap {
                local,
                texel: texel_rect(rp.mask_uv_rect, m.size),
            };
            Some(Sampler::new(m, map))
        }
        None => None,
    };
    let draw = placement.draw(opacity, QuadSource::Texture(content), mask);
    cx.backend.draw_quad(target, &draw)
}

/// Replace the pixels under `placement` with a filtered copy of themselves.
///
/// Only the quad's clipped footprint is snapshotted; the filter clamps at its edge.
fn filter_backdrop(
    backend: &mut dyn RenderBackend,
    target: &mut Surface,
    placement: &Placement,
    filters: &FilterOperations,
) -> TesseraResult<()> {
    let footprint = placement
        .quad
        .pixel_bounds()
        .intersect(placement.clip)
        .intersect(target.bounds());
    if footprint.is_empty() {
        return Ok(());
    }
    let mut snapshot = target.crop(footprint)?;
    backend.apply_filters(&mut snapshot, filters, EdgeMode::Clamp)?;

    let texels = Texels {
        size: snapshot.size(),
        format: ResourceFormat::Rgba8,
        data: &snapshot.data,
    };
    let map = TexMap {
        local: footprint.to_rect(),
        texel: extent(snapshot.width, snapshot.height),
    };
    let mut draw = placement.draw(1.0, QuadSource::Texture(Sampler::new(texels, map)), None);
    draw.to_local = Transform::IDENTITY.homography();
    draw.mode = CompositeMode::Replace;
    tracing::trace!(?footprint, filters = filters.len(), "filtered backdrop");
    backend.draw_quad(target, &draw)
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/lower.rs"]
mod tests;
