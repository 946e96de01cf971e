pub(crate) mod quad;
pub(crate) mod rect;
pub(crate) mod region;
pub(crate) mod transform;
