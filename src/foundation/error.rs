use crate::foundation::ids::{RenderPassId, ResourceId};

/// Convenience result type used throughout `tessera`.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Top-level error type for compositing, resources and backends.
///
/// Every variant is fatal for the frame that produced it: the compositor never retries and never
/// presents a partial image.
#[derive(thiserror::Error, Debug)]
pub enum TesseraError {
    /// The pass list handed to the compositor violates a structural invariant.
    #[error("invalid scene: {0}")]
    InvalidScene(#[from] SceneError),

    /// A resource id is unknown to the provider or has already been deleted.
    #[error("invalid resource: {0}")]
    InvalidResource(ResourceId),

    /// A resource could not be allocated (zero area, unsupported format/usage, too large).
    #[error("allocation error: {0}")]
    Allocation(String),

    /// A rectangle reaches outside the image or resource it addresses.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// The selected backend cannot service the request. Callers may retry on another backend.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Caller-provided values are malformed (bad sizes, non-finite parameters, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Scene document (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TesseraError {
    /// Construct an [`TesseraError::Allocation`].
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Construct an [`TesseraError::OutOfBounds`].
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::OutOfBounds(msg.into())
    }

    /// Construct a [`TesseraError::BackendUnavailable`].
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Construct a [`TesseraError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Construct a [`TesseraError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error reports a malformed scene rather than a resource or backend problem.
    pub fn is_invalid_scene(&self) -> bool {
        matches!(self, Self::InvalidScene(_))
    }
}

/// Structural problems found while resolving a pass list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No passes at all.
    #[error("pass list is empty")]
    EmptyPassList,

    /// Two passes share an id.
    #[error("duplicate render pass id {0}")]
    DuplicatePassId(RenderPassId),

    /// The designated root is not in the list.
    #[error("root pass {0} is not in the pass list")]
    MissingRootPass(RenderPassId),

    /// The requested readback pass is not in the list.
    #[error("readback pass {0} is not in the pass list")]
    MissingReadbackPass(RenderPassId),

    /// A render pass quad references a pass that is not strictly earlier in the list.
    #[error("pass {pass} references pass {referenced} which is not drawn before it")]
    DanglingPassReference {
        /// Pass holding the offending quad.
        pass: RenderPassId,
        /// Pass it points at.
        referenced: RenderPassId,
    },

    /// A render pass quad references its own pass.
    #[error("pass {0} references itself")]
    SelfReference(RenderPassId),

    /// A quad names a shared quad state slot its pass does not have.
    #[error("quad {quad} in pass {pass} uses shared quad state {index}, but the pass has {len}")]
    SharedQuadStateOutOfRange {
        /// Owning pass.
        pass: RenderPassId,
        /// Quad position in the pass's quad list.
        quad: usize,
        /// Referenced slot.
        index: usize,
        /// Number of slots in the pass.
        len: usize,
    },

    /// Non-finite or otherwise unusable geometry.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
