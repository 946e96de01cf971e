use std::fmt;

use crate::foundation::ids::RenderPassId;
use crate::geometry::rect::{Offset, Size};
use crate::render::backend::FrameRGBA;
use crate::scene::pass::RenderPassList;

/// Render the root into a larger device surface and crop the viewport back out.
///
/// The viewport's top-left lands at `offset` inside a `surface_size` surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpandedViewport {
    pub surface_size: Size,
    pub offset: Offset,
}

/// Everything the compositor needs to produce one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRequest {
    /// Dependency order: a pass may only reference passes listed before it.
    pub passes: RenderPassList,
    pub root: RenderPassId,
    pub viewport: Size,
    /// Pass whose own buffer is also returned, cropped to its output rect.
    pub readback: Option<RenderPassId>,
    pub expanded_viewport: Option<ExpandedViewport>,
}

impl FrameRequest {
    pub fn new(passes: RenderPassList, root: RenderPassId, viewport: Size) -> Self {
        Self {
            passes,
            root,
            viewport,
            readback: None,
            expanded_viewport: None,
        }
    }

    pub fn with_readback(mut self, pass: RenderPassId) -> Self {
        self.readback = Some(pass);
        self
    }

    pub fn with_expanded_viewport(mut self, surface_size: Size, offset: Offset) -> Self {
        self.expanded_viewport = Some(ExpandedViewport {
            surface_size,
            offset,
        });
        self
    }
}

/// Per-frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub passes_drawn: u32,
    pub quads_drawn: u32,
    /// Quads skipped because later opaque quads hide them.
    pub quads_culled: u32,
    /// Bytes of intermediate pass buffers allocated for the frame.
    pub intermediate_bytes: u64,
}

/// Result of a successful frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    /// Premultiplied viewport pixels.
    pub frame: FrameRGBA,
    pub readback: Option<FrameRGBA>,
    pub stats: FrameStats,
}

/// Where the compositor is within a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameState {
    #[default]
    Idle,
    Resolving,
    Drawing(RenderPassId),
    Compositing(RenderPassId),
    Done,
    Failed,
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Resolving => f.write_str("resolving"),
            Self::Drawing(id) => write!(f, "drawing {id}"),
            Self::Compositing(id) => write!(f, "compositing {id}"),
            Self::Done => f.write_str("done"),
            Self::Failed => f.write_str("failed"),
        }
    }
}
