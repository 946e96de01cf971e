pub(crate) mod document;
pub(crate) mod pass;
pub(crate) mod picture;
pub(crate) mod quad;
