pub(crate) mod backend;
pub(crate) mod composite;
pub(crate) mod draw;
pub(crate) mod hardware;
pub(crate) mod picture;
pub(crate) mod sample;
pub(crate) mod settings;
pub(crate) mod software;
pub(crate) mod surface;
