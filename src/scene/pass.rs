use crate::foundation::core::Rect;
use crate::foundation::ids::RenderPassId;
use crate::geometry::rect::RectI;
use crate::geometry::transform::Transform;
use crate::scene::quad::DrawQuad;

/// Transform, clip and opacity shared by the quads that index it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SharedQuadState {
    /// Maps quad content space into the pass's target space.
    #[serde(default)]
    pub content_to_target_transform: Transform,
    /// Extent of the layer content. Informational; drawing uses each quad's rects.
    #[serde(default)]
    pub content_bounds: RectI,
    /// Part of `content_bounds` the producer considered visible. Informational, like
    /// `content_bounds`; per-quad culling is carried by `DrawQuad::visible_rect`.
    #[serde(default)]
    pub visible_content_rect: RectI,
    /// Hard clip in target space, honored only when `is_clipped` is set.
    #[serde(default)]
    pub clip_rect: RectI,
    #[serde(default)]
    pub is_clipped: bool,
    /// Multiplied into every quad's alpha. Clamped to 0..1 when drawn; NaN draws nothing.
    #[serde(default = "full_opacity")]
    pub opacity: f32,
}

fn full_opacity() -> f32 {
    1.0
}

impl SharedQuadState {
    /// Unclipped, fully opaque state whose content fills `bounds`.
    pub fn new(content_to_target_transform: Transform, bounds: RectI) -> Self {
        Self {
            content_to_target_transform,
            content_bounds: bounds,
            visible_content_rect: bounds,
            clip_rect: RectI::default(),
            is_clipped: false,
            opacity: 1.0,
        }
    }

    pub fn clipped(mut self, clip_rect: RectI) -> Self {
        self.clip_rect = clip_rect;
        self.is_clipped = true;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub(crate) fn effective_opacity(&self) -> f32 {
        if self.opacity.is_nan() {
            return 0.0;
        }
        self.opacity.clamp(0.0, 1.0)
    }
}

/// One compositing target and the quads drawn into it, back to front.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderPass {
    pub id: RenderPassId,
    pub output_rect: RectI,
    /// Region changed since the last frame. Informational; every frame redraws fully.
    #[serde(default)]
    pub damage_rect: Rect,
    #[serde(default)]
    pub transform_to_root_target: Transform,
    #[serde(default = "transparent_background")]
    pub has_transparent_background: bool,
    pub shared_quad_state_list: Vec<SharedQuadState>,
    pub quad_list: Vec<DrawQuad>,
}

fn transparent_background() -> bool {
    true
}

/// Passes in dependency order; a pass may only reference passes before it.
pub type RenderPassList = Vec<RenderPass>;

impl RenderPass {
    /// Empty pass with a transparent background and full damage.
    pub fn new(id: RenderPassId, output_rect: RectI, transform_to_root_target: Transform) -> Self {
        Self {
            id,
            output_rect,
            damage_rect: output_rect.to_rect(),
            transform_to_root_target,
            has_transparent_background: true,
            shared_quad_state_list: Vec::new(),
            quad_list: Vec::new(),
        }
    }

    pub fn with_transparent_background(mut self, transparent: bool) -> Self {
        self.has_transparent_background = transparent;
        self
    }

    /// Append a shared state and return its index for quads to reference.
    pub fn push_shared_quad_state(&mut self, state: SharedQuadState) -> usize {
        self.shared_quad_state_list.push(state);
        self.shared_quad_state_list.len() - 1
    }

    /// Append a quad on top of everything already in the pass.
    pub fn push_quad(&mut self, quad: DrawQuad) {
        self.quad_list.push(quad);
    }

    /// Ids of the passes this pass draws, in quad order.
    pub fn referenced_passes(&self) -> impl Iterator<Item = RenderPassId> + '_ {
        self.quad_list.iter().filter_map(DrawQuad::referenced_pass)
    }
}
