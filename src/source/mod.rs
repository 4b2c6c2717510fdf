pub(crate) mod animation;
pub(crate) mod frames;
pub(crate) mod loader;
