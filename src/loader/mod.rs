pub(crate) mod memory;
pub(crate) mod metadata;
pub(crate) mod source;
