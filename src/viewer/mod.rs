pub(crate) mod pip;
pub(crate) mod scene;
pub(crate) mod session;
