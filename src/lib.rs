//! Tessera is a layered scene compositor.
//!
//! A caller builds an ordered list of render passes, each holding quads (solid colors, textures,
//! YUV video frames, recorded pictures, or other passes) with shared transform/clip/opacity state.
//! The [`Compositor`] turns that list into premultiplied RGBA8 pixels.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: validate the pass list and pick the passes reachable from the root
//! 2. **Draw**: rasterize each non-root pass into an intermediate buffer, leaves first
//! 3. **Composite**: passes are sampled by the quads that reference them, filters applied
//! 4. **Root**: the root pass is drawn into the viewport and returned as a [`FrameRGBA`]
//!
//! Rasterization is delegated to a [`RenderBackend`] strategy. The software backend works in
//! 8-bit fixed point without anti-aliasing; the hardware backend runs per-pixel float math with
//! edge anti-aliasing. Both agree exactly on axis-aligned opaque content and within a declared
//! tolerance ([`FuzzyPixelComparator`]) elsewhere.
#![forbid(unsafe_code)]

mod compare;
mod compositor;
mod filter;
mod foundation;
mod geometry;
mod render;
mod resource;
mod scene;

pub use compare::{ExactPixelComparator, FuzzyPixelComparator, PixelComparator};
pub use compositor::Compositor;
pub use compositor::frame::{
    ExpandedViewport, FrameOutput, FrameRequest, FrameState, FrameStats,
};
pub use filter::blur::EdgeMode;
pub use filter::matrix::ColorMatrix;
pub use filter::operations::{FilterOperation, FilterOperations, ImageFilter};
pub use foundation::core::{Affine, BezPath, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{SceneError, TesseraError, TesseraResult};
pub use foundation::ids::{RenderPassId, ResourceId};
pub use geometry::rect::{Offset, RectI, Size};
pub use geometry::region::Region;
pub use geometry::transform::Transform;
pub use render::backend::{BackendCaps, BackendKind, FrameRGBA, RenderBackend, create_backend};
pub use render::draw::QuadDraw;
pub use render::hardware::HardwareBackend;
pub use render::settings::RenderSettings;
pub use render::software::SoftwareBackend;
pub use render::surface::Surface;
pub use resource::pool::{PoolOpts, PoolStats};
pub use resource::provider::{
    ResourceFormat, ResourceProvider, ResourceProviderOpts, SharedResourceProvider, Texels,
    TextureUsage,
};
pub use scene::document::{ResourceData, ResourceUpload, SceneDocument};
pub use scene::pass::{RenderPass, RenderPassList, SharedQuadState};
pub use scene::picture::{Picture, PictureOp};
pub use scene::quad::{
    DrawQuad, PictureQuad, QuadMaterial, RenderPassQuad, SolidColorQuad, TextureQuad,
    YuvVideoQuad,
};
