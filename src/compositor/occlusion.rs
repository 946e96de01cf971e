//! Opaque-quad occlusion culling.

use crate::geometry::quad::DeviceQuad;
use crate::geometry::rect::{Offset, RectI};
use crate::geometry::region::Region;
use crate::scene::pass::{RenderPass, SharedQuadState};
use crate::scene::quad::{DrawQuad, QuadMaterial};

/// Pixels of the pass target a quad may touch, after its clip.
fn clipped_device_bounds(quad: &DrawQuad, sqs: &SharedQuadState) -> Option<RectI> {
    let visible = quad.visible_rect.intersect(quad.rect);
    if visible.is_empty() {
        return None;
    }
    let h = sqs.content_to_target_transform.homography();
    let mut bounds = DeviceQuad::project(visible.to_rect(), &h)?.pixel_bounds();
    if sqs.is_clipped {
        bounds = bounds.intersect(sqs.clip_rect);
    }
    (!bounds.is_empty()).then_some(bounds)
}

/// Target pixels a quad is guaranteed to paint fully opaque, if any.
fn opaque_device_rect(quad: &DrawQuad, sqs: &SharedQuadState) -> Option<RectI> {
    let t = &sqs.content_to_target_transform;
    if !t.is_integer_translation() || sqs.effective_opacity() < 1.0 {
        return None;
    }
    let local = match &quad.material {
        QuadMaterial::SolidColor(s) if s.color.is_opaque() => quad.rect,
        QuadMaterial::RenderPass(_) => return None,
        _ => quad.opaque_rect,
    };
    let offset = Offset::new(t.get(0, 3) as i32, t.get(1, 3) as i32);
    let mut rect = local
        .intersect(quad.visible_rect)
        .intersect(quad.rect)
        .checked_offset(offset)?;
    if sqs.is_clipped {
        rect = rect.intersect(sqs.clip_rect);
    }
    (!rect.is_empty()).then_some(rect)
}

/// Which quads of `pass` still need drawing.
///
/// Walks the quad list back to front; a quad whose clipped bounds lie entirely under opaque
/// quads drawn after it is culled. Quads beneath a background-filtered quad are never culled
/// by quads above it.
pub(crate) fn visible_quads(pass: &RenderPass) -> Vec<bool> {
    let mut keep = vec![true; pass.quad_list.len()];
    let mut occluded = Region::new();
    for (i, quad) in pass.quad_list.iter().enumerate().rev() {
        let Some(sqs) = pass.shared_quad_state_list.get(quad.shared_quad_state) else {
            continue;
        };
        if let Some(bounds) = clipped_device_bounds(quad, sqs)
            && occluded.contains_rect(bounds)
        {
            tracing::trace!(pass = %pass.id, quad = i, ?bounds, "culled occluded quad");
            keep[i] = false;
            continue;
        }
        if let Some(rect) = opaque_device_rect(quad, sqs) {
            occluded.union_rect(rect);
        }
        // A backdrop filter reads whatever lies beneath it.
        if let QuadMaterial::RenderPass(rp) = &quad.material
            && !rp.background_filters.is_empty()
        {
            occluded = Region::new();
        }
    }
    keep
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/occlusion.rs"]
mod tests;
