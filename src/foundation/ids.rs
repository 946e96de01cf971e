use std::fmt;

/// Identity of a render pass within one pass list: `(layer_id, index)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct RenderPassId {
    /// Id of the layer that owns the pass.
    pub layer_id: i32,
    /// Index of the pass within that layer.
    pub index: i32,
}

impl RenderPassId {
    /// Build a pass id.
    pub const fn new(layer_id: i32, index: i32) -> Self {
        Self { layer_id, index }
    }
}

impl fmt::Display for RenderPassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.layer_id, self.index)
    }
}

/// Opaque handle to a pixel buffer owned by a [`crate::ResourceProvider`].
///
/// Ids start at 1 and are never reused for the lifetime of a provider.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
