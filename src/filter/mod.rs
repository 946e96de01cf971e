pub(crate) mod blur;
pub(crate) mod matrix;
pub(crate) mod operations;
