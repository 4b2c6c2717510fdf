pub(crate) mod apng;
pub(crate) mod export;
pub(crate) mod gif;
pub(crate) mod timing;
pub(crate) mod webp;
