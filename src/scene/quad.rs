use crate::filter::operations::{FilterOperations, ImageFilter};
use crate::foundation::core::{Rect, Rgba8Premul};
use crate::foundation::ids::{RenderPassId, ResourceId};
use crate::geometry::rect::{RectI, Size};
use crate::scene::picture::Picture;

/// One drawable primitive. Rects are in the content space of its shared quad state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawQuad {
    /// Index into the owning pass's `shared_quad_state_list`.
    pub shared_quad_state: usize,
    pub rect: RectI,
    /// Part of `rect` known to be fully opaque. Empty when unknown.
    #[serde(default)]
    pub opaque_rect: RectI,
    /// Part of `rect` that must be drawn.
    pub visible_rect: RectI,
    pub material: QuadMaterial,
}

/// The closed set of quad kinds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuadMaterial {
    SolidColor(SolidColorQuad),
    RenderPass(RenderPassQuad),
    YuvVideo(YuvVideoQuad),
    Picture(PictureQuad),
    Texture(TextureQuad),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SolidColorQuad {
    pub color: Rgba8Premul,
    #[serde(default)]
    pub force_anti_aliasing_off: bool,
}

/// Draws the finished buffer of an earlier pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderPassQuad {
    pub render_pass_id: RenderPassId,
    #[serde(default)]
    pub is_replica: bool,
    #[serde(default)]
    pub mask_resource_id: Option<ResourceId>,
    /// Normalized mask coordinates mapped onto the quad rect.
    #[serde(default = "unit_rect")]
    pub mask_uv_rect: Rect,
    #[serde(default)]
    pub contents_changed_since_last_frame: Rect,
    /// Foreground filters, applied to the pass content.
    #[serde(default)]
    pub filters: FilterOperations,
    /// Runs after `filters`.
    #[serde(default)]
    pub filter: Option<ImageFilter>,
    /// Applied to what is already drawn beneath the quad.
    #[serde(default)]
    pub background_filters: FilterOperations,
}

fn unit_rect() -> Rect {
    Rect::new(0.0, 0.0, 1.0, 1.0)
}

impl RenderPassQuad {
    pub fn new(render_pass_id: RenderPassId) -> Self {
        Self {
            render_pass_id,
            is_replica: false,
            mask_resource_id: None,
            mask_uv_rect: unit_rect(),
            contents_changed_since_last_frame: Rect::ZERO,
            filters: FilterOperations::default(),
            filter: None,
            background_filters: FilterOperations::default(),
        }
    }

    pub fn with_mask(mut self, mask: ResourceId, uv_rect: Rect) -> Self {
        self.mask_resource_id = Some(mask);
        self.mask_uv_rect = uv_rect;
        self
    }

    pub fn with_filters(mut self, filters: FilterOperations) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_image_filter(mut self, filter: ImageFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_background_filters(mut self, filters: FilterOperations) -> Self {
        self.background_filters = filters;
        self
    }

    pub fn replica(mut self) -> Self {
        self.is_replica = true;
        self
    }

    /// `filters` followed by the image filter, as one pipeline.
    pub fn foreground_filters(&self) -> FilterOperations {
        let mut ops = self.filters.clone();
        if let Some(f) = &self.filter {
            ops.0.extend(f.to_operations().0);
        }
        ops
    }
}

/// Planar BT.601 video frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct YuvVideoQuad {
    pub y_plane: ResourceId,
    pub u_plane: ResourceId,
    pub v_plane: ResourceId,
    #[serde(default)]
    pub a_plane: Option<ResourceId>,
    /// Decoded frame size; empty means the Y plane size.
    #[serde(default)]
    pub tex_size: Size,
}

/// Recorded drawing commands rasterized at draw time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PictureQuad {
    /// Texel rect of the rasterized picture mapped onto the quad rect.
    pub tex_coord_rect: Rect,
    pub texture_size: Size,
    #[serde(default)]
    pub contents_swizzled: bool,
    pub content_rect: RectI,
    #[serde(default = "unit_scale")]
    pub contents_scale: f32,
    pub picture: Picture,
}

fn unit_scale() -> f32 {
    1.0
}

/// An existing resource sampled over the quad.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextureQuad {
    pub resource_id: ResourceId,
    /// Normalized texture coordinates mapped onto the quad rect.
    #[serde(default = "unit_rect")]
    pub uv_rect: Rect,
    #[serde(default = "premultiplied")]
    pub premultiplied_alpha: bool,
    /// Output rect of the pass that produced the texture, if any. Informational; sampling
    /// uses `uv_rect` over the whole resource.
    #[serde(default)]
    pub output_rect: RectI,
}

fn premultiplied() -> bool {
    true
}

impl TextureQuad {
    pub fn new(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            uv_rect: unit_rect(),
            premultiplied_alpha: true,
            output_rect: RectI::default(),
        }
    }
}

impl DrawQuad {
    pub fn solid_color(
        shared_quad_state: usize,
        rect: RectI,
        color: Rgba8Premul,
        force_anti_aliasing_off: bool,
    ) -> Self {
        Self {
            shared_quad_state,
            rect,
            opaque_rect: if color.is_opaque() { rect } else { RectI::default() },
            visible_rect: rect,
            material: QuadMaterial::SolidColor(SolidColorQuad {
                color,
                force_anti_aliasing_off,
            }),
        }
    }

    pub fn render_pass(shared_quad_state: usize, rect: RectI, quad: RenderPassQuad) -> Self {
        Self {
            shared_quad_state,
            rect,
            opaque_rect: RectI::default(),
            visible_rect: rect,
            material: QuadMaterial::RenderPass(quad),
        }
    }

    pub fn yuv_video(
        shared_quad_state: usize,
        rect: RectI,
        opaque_rect: RectI,
        quad: YuvVideoQuad,
    ) -> Self {
        Self {
            shared_quad_state,
            rect,
            opaque_rect,
            visible_rect: rect,
            material: QuadMaterial::YuvVideo(quad),
        }
    }

    pub fn picture(
        shared_quad_state: usize,
        rect: RectI,
        opaque_rect: RectI,
        quad: PictureQuad,
    ) -> Self {
        Self {
            shared_quad_state,
            rect,
            opaque_rect,
            visible_rect: rect,
            material: QuadMaterial::Picture(quad),
        }
    }

    pub fn texture(
        shared_quad_state: usize,
        rect: RectI,
        opaque_rect: RectI,
        quad: TextureQuad,
    ) -> Self {
        Self {
            shared_quad_state,
            rect,
            opaque_rect,
            visible_rect: rect,
            material: QuadMaterial::Texture(quad),
        }
    }

    pub fn with_visible_rect(mut self, visible_rect: RectI) -> Self {
        self.visible_rect = visible_rect;
        self
    }

    /// Whether drawing must blend with what is beneath.
    pub fn needs_blending(&self, opacity: f32) -> bool {
        if opacity < 1.0
            || self.opaque_rect.is_empty()
            || !self.opaque_rect.contains(self.visible_rect)
        {
            return true;
        }
        match &self.material {
            QuadMaterial::SolidColor(s) => !s.color.is_opaque(),
            QuadMaterial::YuvVideo(y) => y.a_plane.is_some(),
            QuadMaterial::RenderPass(_) => true,
            QuadMaterial::Picture(_) | QuadMaterial::Texture(_) => false,
        }
    }

    /// The pass drawn by a render pass quad.
    pub fn referenced_pass(&self) -> Option<RenderPassId> {
        match &self.material {
            QuadMaterial::RenderPass(rp) => Some(rp.render_pass_id),
            _ => None,
        }
    }

    /// Resources sampled when drawing this quad.
    pub fn resource_ids(&self) -> Vec<ResourceId> {
        match &self.material {
            QuadMaterial::SolidColor(_) | QuadMaterial::Picture(_) => Vec::new(),
            QuadMaterial::RenderPass(rp) => rp.mask_resource_id.into_iter().collect(),
            QuadMaterial::YuvVideo(y) => {
                let mut ids = vec![y.y_plane, y.u_plane, y.v_plane];
                ids.extend(y.a_plane);
                ids
            }
            QuadMaterial::Texture(t) => vec![t.resource_id],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/quad.rs"]
mod tests;
