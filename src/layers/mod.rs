pub(crate) mod config;
pub(crate) mod ids;
pub(crate) mod layer;
